mod config;
mod error;
mod state;
mod telemetry;
pub mod routes {
    pub mod conflicts;
    pub mod exams;
    pub mod faculty;
    pub mod health;
    pub mod jobs;
    pub mod schedule;
    pub mod validate;
}

use axum::{
    routing::{get, post},
    Router,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
        paths(
            routes::health::health,
            routes::exams::schedule,
            routes::faculty::schedule,
            routes::schedule::schedule,
            routes::jobs::status,
            routes::jobs::result,
            routes::validate::validate_handler,
            routes::conflicts::conflicts,
        ),
        components(schemas(
            types::ExamRequest, types::ExamSchedule, types::TimeSlot, types::SlotGrid,
            types::ColoringOrder, types::ConflictDetail, types::ConflictReport,
            types::FacultyRequest, types::InvigilationPolicy, types::FacultyAssignment,
            types::SlotInvigilation, types::UncoveredSubSlot, types::ScheduleRequest,
            types::ScheduleResult, types::ConflictsRequest, types::StudentId,
            types::CourseId, types::FacultyId,
            jobs::JobId, jobs::JobStatus,
            routes::validate::ValidationReport,
            routes::schedule::JobCreated,
        )),
        tags(
            (name = "examsched", description = "Exam timetabling and invigilation API")
        )
    )]
struct ApiDoc;

fn app(state: state::AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/v1/health", get(routes::health::health))
        .route("/v1/exams/schedule", post(routes::exams::schedule))
        .route("/v1/faculty/schedule", post(routes::faculty::schedule))
        .route("/v1/schedule", post(routes::schedule::schedule))
        .route("/v1/validate", post(routes::validate::validate_handler))
        .route("/v1/conflicts", post(routes::conflicts::conflicts))
        .route("/v1/jobs/:id", get(routes::jobs::status))
        .route("/v1/jobs/:id/result", get(routes::jobs::result))
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
        .layer(telemetry::stack(body_limit_bytes))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cfg = config::Config::from_env()?;
    let app = app(
        state::AppState::new(cfg.limits, cfg.jobs_max_retained),
        cfg.body_limit_bytes,
    );

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, limits = ?cfg.limits, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await?;
    Ok(())
}

async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(?e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::{Request, StatusCode};
    use sched_core::Limits;
    use tower::ServiceExt;

    fn router() -> Router {
        app(
            state::AppState::new(Limits::default(), jobs::DEFAULT_MAX_RETAINED),
            2 * 1024 * 1024,
        )
    }

    async fn call(router: Router, method: &str, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(if method == "GET" {
                Body::empty()
            } else {
                Body::from(body.to_string())
            })
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn exams_endpoint_reports_conflicts() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/exams/schedule",
            serde_json::json!({
                "enrollment": {"s1": ["A", "B", "C"]},
                "courseList": ["A", "B", "C"],
                "days": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conflicts"], 1);
        assert_eq!(body["overflowCount"], 1);
        assert_eq!(body["timetable"]["Day 1, Slot 2 (12.5:00-15.5:00)"][0], "B");
    }

    #[tokio::test]
    async fn invalid_input_is_unprocessable() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/exams/schedule",
            serde_json::json!({"courseList": ["A"], "days": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0], "days must be positive");
    }

    #[tokio::test]
    async fn faculty_endpoint_assigns_first_available() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/faculty/schedule",
            serde_json::json!({
                "timetable": {"Day 1, Slot 1 (9:00-12:00)": ["A"]},
                "facultyAvailability": {"F1": [[9, 10]], "F2": [[9, 12]]},
                "examDates": ["2024-05-01"]
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let slot = &body["Day 1, Slot 1 (9:00-12:00)"];
        assert_eq!(slot["date"], "2024-05-01");
        assert_eq!(slot["subSlotAssignments"]["9:00-10:00"][0]["faculty"], "F1");
        assert_eq!(slot["subSlotAssignments"]["10:00-11:00"][0]["faculty"], "F2");
        assert_eq!(slot["subSlotAssignments"]["11:00-12:00"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn validate_lists_every_problem() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/validate",
            serde_json::json!({
                "courseList": ["A"],
                "examDates": ["2024-05-01", "2024-05-01"],
                "facultyAvailability": {"F1": [[12, 10]]}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], false);
        assert_eq!(body["errors"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn conflicts_endpoint_measures_a_given_timetable() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/conflicts",
            serde_json::json!({
                "enrollment": {"s1": ["A", "B"]},
                "timetable": {"Day 1, Slot 1 (9:00-12:00)": ["A", "B"]},
                "days": 1
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["conflicts"], 1);
        assert_eq!(body["conflictDetails"][0]["student"], "s1");
    }

    #[tokio::test]
    async fn unknown_job_is_not_found() {
        let (status, _) = call(router(), "GET", "/v1/jobs/nope", serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = call(router(), "GET", "/v1/jobs/nope/result", serde_json::Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn combined_job_runs_to_completion() {
        let router = router();
        let (status, body) = call(
            router.clone(),
            "POST",
            "/v1/schedule",
            serde_json::json!({
                "enrollment": {"s1": ["A", "B"]},
                "courseList": ["A", "B"],
                "examDates": ["2024-05-01"],
                "facultyAvailability": {"F1": [[9, 17]]}
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "queued");
        let id = body["jobId"].as_str().unwrap().to_string();

        let mut result = serde_json::Value::Null;
        for _ in 0..100 {
            let (status, body) = call(
                router.clone(),
                "GET",
                &format!("/v1/jobs/{id}/result"),
                serde_json::Value::Null,
            )
            .await;
            if status == StatusCode::OK {
                result = body;
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(result["exams"]["conflicts"], 0);
        assert_eq!(result["stats"]["conflicts"], 0);
        assert!(result["invigilation"]["Day 1, Slot 1 (9:00-12:00)"].is_object());
    }

    #[tokio::test]
    async fn combined_job_rejects_bad_input_up_front() {
        let (status, body) = call(
            router(),
            "POST",
            "/v1/schedule",
            serde_json::json!({"courseList": ["A"], "examDates": []}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"][0], "examDates is empty");
    }
}
