use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use sched_core::validate_schedule;
use types::ScheduleRequest;
use utoipa::ToSchema;

#[derive(serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
    pub status: &'static str,
}

#[utoipa::path(
        post,
        path = "/v1/schedule",
        request_body = ScheduleRequest,
        responses(
            (status = 200, description = "Job enqueued", body = JobCreated),
            (status = 422, description = "Request failed validation")
        )
    )]
pub async fn schedule(
    State(state): State<AppState>,
    Json(req): Json<ScheduleRequest>,
) -> Result<Json<JobCreated>, ApiError> {
    validate_schedule(&req, &state.limits)?;
    let id = state.jobs.enqueue(req);
    Ok(Json(JobCreated {
        job_id: id.0,
        status: "queued",
    }))
}
