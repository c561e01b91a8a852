use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use sched_core::conflicts::timetable_conflicts;
use types::{ConflictReport, ConflictsRequest};

#[utoipa::path(
    post,
    path = "/v1/conflicts",
    request_body = ConflictsRequest,
    responses(
        (status = 200, description = "Student clashes in the supplied timetable", body = ConflictReport),
        (status = 422, description = "Request failed validation")
    )
)]
pub async fn conflicts(
    State(state): State<AppState>,
    Json(req): Json<ConflictsRequest>,
) -> Result<Json<ConflictReport>, ApiError> {
    Ok(Json(timetable_conflicts(&req, &state.limits)?))
}
