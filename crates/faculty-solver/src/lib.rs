//! Invigilation roster on top of a finished exam timetable.
//!
//! Each exam sitting is cut into one-hour sub-slots and every sub-slot gets at
//! most one invigilator: the first faculty member, in table order, who is
//! available for the whole hour, still under the daily cap and not already
//! busy at that hour. Sub-slots nobody can take stay empty.
//!
//! Sub-slots start at the sitting's own start time. With the default grid
//! the afternoon sitting begins at 12.5, so its sub-slots are 12.5-13.5,
//! 13.5-14.5 and 14.5-15.5: a faculty member whose availability starts at
//! 13:00 can never cover the first of them.

mod availability;
mod ledger;

pub use availability::{covers, normalize};

use ledger::Ledger;
use sched_core::{validate_faculty, Limits, ValidationError};
use std::collections::BTreeMap;
use tracing::{debug, info};
use types::{
    ExamFacultySchedule, FacultyAssignment, FacultyRequest, SlotInvigilation, SubSlotLabel,
    UncoveredSubSlot,
};

pub fn schedule_faculties(
    req: &FacultyRequest,
    limits: &Limits,
) -> Result<ExamFacultySchedule, ValidationError> {
    validate_faculty(req, limits)?;

    info!(
        slots = req.timetable.len(),
        faculty = req.faculty_availability.len(),
        days = req.exam_dates.len(),
        cap = req.policy.max_assignments_per_day,
        "assigning invigilators"
    );

    let availability = normalize(&req.faculty_availability);
    let mut ledger = Ledger::new(req.policy.max_assignments_per_day);
    let mut schedule = ExamFacultySchedule::new();

    // timetable keys iterate chronologically
    for (label, courses) in &req.timetable {
        let slot = label.0;
        let date = (slot.day as usize)
            .checked_sub(1)
            .and_then(|i| req.exam_dates.get(i))
            .cloned()
            .unwrap_or_default();

        let mut sub_slot_assignments = BTreeMap::new();
        for sub in slot.range().hourly() {
            let pick = availability
                .iter()
                .find(|(faculty, ranges)| {
                    covers(ranges, &sub) && ledger.can_take(slot.day, faculty, &sub)
                })
                .map(|(faculty, _)| faculty.clone());

            let assigned = match pick {
                Some(faculty) => {
                    ledger.record(slot.day, &faculty, sub);
                    vec![FacultyAssignment {
                        faculty,
                        hour_range: sub,
                    }]
                }
                None => {
                    debug!(%label, sub_slot = %sub, "no invigilator available");
                    Vec::new()
                }
            };
            sub_slot_assignments.insert(SubSlotLabel(sub), assigned);
        }

        schedule.insert(
            *label,
            SlotInvigilation {
                courses: courses.clone(),
                date,
                sub_slot_assignments,
            },
        );
    }

    let missing = uncovered(&schedule).len();
    info!(uncovered = missing, "invigilation roster ready");
    Ok(schedule)
}

/// Sub-slots left without an invigilator, in schedule order.
pub fn uncovered(schedule: &ExamFacultySchedule) -> Vec<UncoveredSubSlot> {
    schedule
        .iter()
        .flat_map(|(label, inv)| {
            inv.sub_slot_assignments
                .iter()
                .filter(|(_, assigned)| assigned.is_empty())
                .map(|(sub, _)| UncoveredSubSlot {
                    slot: *label,
                    sub_slot: *sub,
                })
        })
        .collect()
}
