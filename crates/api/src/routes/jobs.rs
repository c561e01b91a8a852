use crate::{error::ApiError, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jobs::JobStatus;
use types::ScheduleResult;

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Job status", body = jobs::JobStatus),
            (status = 404, description = "Unknown job")
        )
    )]
pub async fn status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobStatus>, ApiError> {
    state.jobs.get(&id).map(Json).ok_or(ApiError::NotFound(id))
}

#[utoipa::path(
        get,
        path = "/v1/jobs/{id}/result",
        params(("id" = String, Path, description = "Job ID")),
        responses(
            (status = 200, description = "Schedule result", body = ScheduleResult),
            (status = 202, description = "Job still running"),
            (status = 404, description = "Unknown job")
        )
    )]
pub async fn result(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    Ok(match state.jobs.get(&id) {
        Some(JobStatus::Done { result }) => Json(result).into_response(),
        Some(st) if st.is_finished() => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(st)).into_response()
        }
        Some(st) => (StatusCode::ACCEPTED, Json(st)).into_response(),
        None => return Err(ApiError::NotFound(id)),
    })
}
