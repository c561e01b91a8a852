use types::{Hour, SlotGrid, TimeSlot};

/// Lays out exam sittings day-major, then time-major. A sitting is kept only
/// if it ends no later than `grid.day_end`.
pub fn generate_slots(grid: &SlotGrid, days: u32) -> Vec<TimeSlot> {
    let mut slots = Vec::new();
    if grid.exam_duration.is_zero() {
        return slots;
    }
    let stride = grid.exam_duration.plus(grid.break_duration);
    for day in 1..=days {
        let mut start = grid.day_start;
        let mut slot = 1;
        while start.minutes() + grid.exam_duration.minutes() <= grid.day_end.minutes() {
            slots.push(TimeSlot {
                day,
                slot,
                start_time: start,
                end_time: start.plus(grid.exam_duration),
            });
            let next = start.plus(stride);
            if next == start {
                break;
            }
            start = next;
            slot += 1;
        }
    }
    slots
}

pub fn slots_per_day(grid: &SlotGrid) -> u32 {
    generate_slots(grid, 1).len() as u32
}

pub fn day_length(grid: &SlotGrid) -> Hour {
    grid.day_end.saturating_sub(grid.day_start)
}
