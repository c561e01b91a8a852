use async_trait::async_trait;
use exam_solver::schedule_exams;
use faculty_solver::{schedule_faculties, uncovered};
use jobs::InMemJobs;
use sched_core::{validate_schedule, Limits, ScheduleRequest, ScheduleResult, Scheduler};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<InMemJobs<Pipeline>>,
    pub limits: Limits,
}

/// Exam timetable first, then the invigilation roster over it.
#[derive(Clone)]
pub struct Pipeline {
    limits: Limits,
}

impl Pipeline {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    pub fn run(&self, req: &ScheduleRequest) -> anyhow::Result<ScheduleResult> {
        validate_schedule(req, &self.limits)?;
        let exams = schedule_exams(&req.exam_request(), &self.limits)?;
        let invigilation =
            schedule_faculties(&req.faculty_request(exams.timetable.clone()), &self.limits)?;
        let uncovered = uncovered(&invigilation);

        let stats = serde_json::json!({
            "uncoveredSubSlots": uncovered.len(),
            "conflicts": exams.conflicts,
            "overflowCount": exams.overflow_count,
            "examDates": req.exam_dates.len(),
            "faculty": req.faculty_availability.len(),
        });
        Ok(ScheduleResult {
            exams,
            invigilation,
            uncovered,
            stats,
        })
    }
}

#[async_trait]
impl Scheduler for Pipeline {
    async fn schedule(&self, req: ScheduleRequest) -> anyhow::Result<ScheduleResult> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.run(&req)).await?
    }
}

impl AppState {
    pub fn new(limits: Limits, jobs_max_retained: usize) -> Self {
        let jobs = InMemJobs::new(Pipeline::new(limits)).with_max_retained(jobs_max_retained);
        Self {
            jobs: Arc::new(jobs),
            limits,
        }
    }
}
