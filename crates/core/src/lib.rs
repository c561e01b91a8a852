pub mod conflicts;
pub mod limits;
pub mod slots;

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

pub use limits::Limits;
pub use types::{
    ConflictsRequest, CourseId, Enrollment, ExamRequest, ExamSchedule, FacultyRequest,
    ScheduleRequest, ScheduleResult, SlotGrid, Timetable,
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
    #[error("input too large: {count} {what} exceeds the limit of {limit}")]
    TooLarge {
        what: &'static str,
        count: usize,
        limit: usize,
    },
}

impl ValidationError {
    pub fn messages(&self) -> Vec<String> {
        match self {
            ValidationError::Invalid(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

fn chk_limit(what: &'static str, count: usize, limit: usize) -> Result<(), ValidationError> {
    if count > limit {
        return Err(ValidationError::TooLarge { what, count, limit });
    }
    Ok(())
}

fn finish(errors: Vec<String>) -> Result<(), ValidationError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::Invalid(errors))
    }
}

fn chk_grid(grid: &SlotGrid, errors: &mut Vec<String>) {
    if grid.exam_duration.is_zero() {
        errors.push("grid.examDuration must be positive".into());
    }
    if grid.day_start >= grid.day_end {
        errors.push(format!(
            "grid.dayStart {} must be before grid.dayEnd {}",
            grid.day_start, grid.day_end
        ));
    } else if grid.exam_duration > slots::day_length(grid) {
        errors.push(format!(
            "grid.examDuration {}h does not fit in a {}h exam day",
            grid.exam_duration,
            slots::day_length(grid)
        ));
    }
}

fn chk_ids<'a>(name: &str, mut ids: impl Iterator<Item = &'a String>, errors: &mut Vec<String>) {
    if ids.any(|id| id.trim().is_empty()) {
        errors.push(format!("{name} contains an empty id"));
    }
}

pub fn validate_exams(req: &ExamRequest, limits: &Limits) -> Result<(), ValidationError> {
    chk_limit("courses", req.course_list.len(), limits.max_courses)?;
    chk_limit("students", req.enrollment.len(), limits.max_students)?;
    chk_limit("days", req.days as usize, limits.max_days as usize)?;

    let mut errors: Vec<String> = Vec::new();
    if req.days == 0 {
        errors.push("days must be positive".into());
    }
    chk_grid(&req.grid, &mut errors);
    chk_ids("courseList", req.course_list.iter().map(|c| &c.0), &mut errors);
    chk_ids("enrollment", req.enrollment.keys().map(|s| &s.0), &mut errors);
    finish(errors)
}

pub fn validate_faculty(req: &FacultyRequest, limits: &Limits) -> Result<(), ValidationError> {
    chk_limit("faculty", req.faculty_availability.len(), limits.max_faculty)?;
    chk_limit("exam dates", req.exam_dates.len(), limits.max_days as usize)?;

    let mut errors: Vec<String> = Vec::new();
    chk_grid(&req.grid, &mut errors);
    if req.policy.max_assignments_per_day == 0 {
        errors.push("policy.maxAssignmentsPerDay must be positive".into());
    }
    chk_ids(
        "facultyAvailability",
        req.faculty_availability.keys().map(|f| &f.0),
        &mut errors,
    );

    let window = req.grid.business_hours();
    for (faculty, ranges) in &req.faculty_availability {
        for r in ranges {
            if r.is_empty() {
                errors.push(format!(
                    "faculty {faculty} has an empty or inverted interval [{}, {})",
                    r.start(),
                    r.end()
                ));
            } else if !window.covers(r) {
                errors.push(format!(
                    "faculty {faculty} interval [{}, {}) lies outside business hours {}",
                    r.start(),
                    r.end(),
                    window
                ));
            }
        }
    }

    let days = req.exam_dates.len();
    for label in req.timetable.keys() {
        if label.0.day as usize > days {
            errors.push(format!(
                "timetable slot {label} falls on day {} but only {days} exam dates were given",
                label.0.day
            ));
        }
    }
    finish(errors)
}

pub fn validate_schedule(req: &ScheduleRequest, limits: &Limits) -> Result<(), ValidationError> {
    let mut errors: Vec<String> = Vec::new();
    if req.exam_dates.is_empty() {
        errors.push("examDates is empty".into());
    }
    let mut seen = HashSet::new();
    for d in &req.exam_dates {
        if !seen.insert(d.as_str()) {
            errors.push(format!("duplicate exam date {d}"));
        }
    }

    for res in [
        validate_exams(&req.exam_request(), limits),
        validate_faculty(&req.faculty_request(Timetable::new()), limits),
    ] {
        match res {
            Ok(()) => {}
            Err(ValidationError::Invalid(more)) => {
                for e in more {
                    if !errors.contains(&e) {
                        errors.push(e);
                    }
                }
            }
            Err(too_large) => return Err(too_large),
        }
    }
    if req.exam_dates.is_empty() {
        errors.retain(|e| e != "days must be positive");
    }
    finish(errors)
}

pub fn validate_conflicts(req: &ConflictsRequest, limits: &Limits) -> Result<(), ValidationError> {
    chk_limit("students", req.enrollment.len(), limits.max_students)?;
    chk_limit("days", req.days as usize, limits.max_days as usize)?;
    let mut errors: Vec<String> = Vec::new();
    if req.days == 0 {
        errors.push("days must be positive".into());
    }
    chk_grid(&req.grid, &mut errors);
    finish(errors)
}

/// Runs a whole scheduling pass. Implementations hold no per-run state.
#[async_trait]
pub trait Scheduler: Send + Sync + 'static {
    async fn schedule(&self, req: ScheduleRequest) -> anyhow::Result<ScheduleResult>;
}
