use std::collections::HashMap;
use types::{FacultyId, HourRange};

#[derive(Default)]
struct DayUsage {
    assignments: HashMap<FacultyId, u32>,
    hours: HashMap<FacultyId, Vec<HourRange>>,
}

/// Who has invigilated what, per exam day. Lives for exactly one
/// scheduling call and is dropped with it.
pub(crate) struct Ledger {
    cap: u32,
    days: HashMap<u32, DayUsage>,
}

impl Ledger {
    pub(crate) fn new(cap: u32) -> Self {
        Self {
            cap,
            days: HashMap::new(),
        }
    }

    pub(crate) fn can_take(&self, day: u32, faculty: &FacultyId, sub: &HourRange) -> bool {
        let Some(usage) = self.days.get(&day) else {
            return self.cap > 0;
        };
        let used = usage.assignments.get(faculty).copied().unwrap_or(0);
        let busy = usage
            .hours
            .get(faculty)
            .is_some_and(|hs| hs.iter().any(|h| h.overlaps(sub)));
        used < self.cap && !busy
    }

    pub(crate) fn record(&mut self, day: u32, faculty: &FacultyId, sub: HourRange) {
        let usage = self.days.entry(day).or_default();
        *usage.assignments.entry(faculty.clone()).or_default() += 1;
        usage.hours.entry(faculty.clone()).or_default().push(sub);
    }
}
