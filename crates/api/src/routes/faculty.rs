use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use faculty_solver::schedule_faculties;
use types::{ExamFacultySchedule, FacultyRequest};

#[utoipa::path(
    post,
    path = "/v1/faculty/schedule",
    request_body = FacultyRequest,
    responses(
        (status = 200, description = "Invigilators per exam sub-slot"),
        (status = 422, description = "Request failed validation")
    )
)]
pub async fn schedule(
    State(state): State<AppState>,
    Json(req): Json<FacultyRequest>,
) -> Result<Json<ExamFacultySchedule>, ApiError> {
    Ok(Json(schedule_faculties(&req, &state.limits)?))
}
