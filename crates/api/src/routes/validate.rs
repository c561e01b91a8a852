use crate::state::AppState;
use axum::{extract::State, Json};
use sched_core::validate_schedule;
use serde::Serialize;
use types::ScheduleRequest;

#[derive(Serialize, utoipa::ToSchema)]
pub struct ValidationReport {
    pub ok: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/v1/validate",
    request_body = ScheduleRequest,
    responses(
    (status = 200, description = "Validation result", body = ValidationReport)
    )
)]
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Json<ValidationReport> {
    Json(match validate_schedule(&req, &state.limits) {
        Ok(()) => ValidationReport {
            ok: true,
            errors: vec![],
        },
        Err(e) => ValidationReport {
            ok: false,
            errors: e.messages(),
        },
    })
}
