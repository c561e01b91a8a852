use crate::{error::ApiError, state::AppState};
use axum::{extract::State, Json};
use exam_solver::schedule_exams;
use types::{ExamRequest, ExamSchedule};

#[utoipa::path(
    post,
    path = "/v1/exams/schedule",
    request_body = ExamRequest,
    responses(
        (status = 200, description = "Exam timetable with conflict report", body = ExamSchedule),
        (status = 422, description = "Request failed validation")
    )
)]
pub async fn schedule(
    State(state): State<AppState>,
    Json(req): Json<ExamRequest>,
) -> Result<Json<ExamSchedule>, ApiError> {
    Ok(Json(schedule_exams(&req, &state.limits)?))
}
