//! Exam timetabling by greedy coloring of the student clash graph.
//!
//! Courses are vertices, a shared student is an edge and a slot of the
//! generated grid is a color. Courses that cannot be colored are not an
//! error: they are put in the first slot and their clashes show up in the
//! conflict report.

mod coloring;
mod graph;

pub use coloring::{color, Coloring};
pub use graph::ConflictGraph;

use sched_core::conflicts::compute_conflicts;
use sched_core::slots::{generate_slots, slots_per_day};
use sched_core::{validate_exams, Limits, ValidationError};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};
use types::{CourseId, ExamRequest, ExamSchedule, TimeSlot, Timetable};

/// Drops repeated course ids, keeping the first occurrence.
pub fn dedup_courses(list: &[CourseId]) -> Vec<CourseId> {
    let mut seen = HashSet::new();
    list.iter().filter(|c| seen.insert(*c)).cloned().collect()
}

pub fn schedule_exams(req: &ExamRequest, limits: &Limits) -> Result<ExamSchedule, ValidationError> {
    validate_exams(req, limits)?;

    let courses = dedup_courses(&req.course_list);
    info!(
        courses = courses.len(),
        students = req.enrollment.len(),
        days = req.days,
        ordering = %req.ordering,
        "scheduling exams"
    );

    let graph = ConflictGraph::build(&req.enrollment, &courses);
    let slots = generate_slots(&req.grid, req.days);
    let per_day = slots_per_day(&req.grid);
    if let Some(asked) = req.slots_per_day {
        if asked != per_day {
            warn!(
                requested = asked,
                generated = per_day,
                "slotsPerDay differs from what the grid fits; using the grid"
            );
        }
    }

    let coloring = color(&graph, slots.len(), req.ordering);
    let overflow_courses: Vec<CourseId> = coloring
        .overflow
        .iter()
        .map(|&i| graph.course(i).clone())
        .collect();
    if !overflow_courses.is_empty() {
        debug!(?overflow_courses, "courses forced into slot 0");
    }

    let slot_of: HashMap<&CourseId, usize> = courses
        .iter()
        .enumerate()
        .map(|(i, c)| (c, coloring.slot_of[i]))
        .collect();
    let report = compute_conflicts(&req.enrollment, &courses, &slot_of);

    let timetable = build_timetable(&graph, &coloring, &slots);

    info!(
        conflicts = report.conflicts,
        overflow = overflow_courses.len(),
        slots = slots.len(),
        "exam schedule ready"
    );

    Ok(ExamSchedule {
        timetable,
        conflicts: report.conflicts,
        conflict_details: report.conflict_details,
        overflow_count: overflow_courses.len() as u32,
        overflow_courses,
        stats: serde_json::json!({
            "method": "greedy-coloring",
            "ordering": req.ordering.to_string(),
            "courses": courses.len(),
            "students": req.enrollment.len(),
            "edges": graph.edge_count(),
            "totalSlots": slots.len(),
            "slotsPerDay": per_day,
            "requestedSlotsPerDay": req.slots_per_day,
            "colorsUsed": coloring.colors_used(),
        }),
        slots,
    })
}

/// Colored courses in list order, then overflow courses in the order they
/// overflowed.
fn build_timetable(graph: &ConflictGraph, coloring: &Coloring, slots: &[TimeSlot]) -> Timetable {
    let mut timetable = Timetable::new();
    let colored = (0..graph.len()).filter(|&i| !coloring.is_overflow(i));
    for i in colored.chain(coloring.overflow.iter().copied()) {
        let Some(slot) = slots.get(coloring.slot_of[i]) else {
            continue;
        };
        timetable
            .entry(slot.label())
            .or_default()
            .push(graph.course(i).clone());
    }
    timetable
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::{ColoringOrder, Enrollment, Hour, SlotGrid, StudentId};

    fn ids(v: &[&str]) -> Vec<CourseId> {
        v.iter().map(|s| CourseId::from(*s)).collect()
    }

    /// Each student's courses are given space-separated.
    fn req(students: &[(&str, &str)], list: &[&str], days: u32) -> ExamRequest {
        ExamRequest {
            enrollment: students
                .iter()
                .map(|(s, cs)| {
                    let courses: Vec<&str> = cs.split_whitespace().collect();
                    (StudentId::from(*s), ids(&courses))
                })
                .collect(),
            course_list: ids(list),
            days,
            slots_per_day: None,
            grid: SlotGrid::default(),
            ordering: ColoringOrder::ListOrder,
        }
    }

    fn slot_of(s: &ExamSchedule, course: &str) -> Vec<String> {
        s.timetable
            .iter()
            .filter(|(_, cs)| cs.iter().any(|c| c.0 == course))
            .map(|(label, _)| label.to_string())
            .collect()
    }

    #[test]
    fn chain_of_clashes_is_conflict_free() {
        let r = req(&[("s1", "A B"), ("s2", "B C")], &["A", "B", "C"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.conflicts, 0);
        assert!(s.conflict_details.is_empty());
        assert_eq!(s.overflow_count, 0);
        assert_ne!(slot_of(&s, "A"), slot_of(&s, "B"));
        assert_ne!(slot_of(&s, "B"), slot_of(&s, "C"));
        assert_eq!(s.stats["edges"], 2);
    }

    #[test]
    fn triangle_spreads_over_two_days() {
        let mut r = req(
            &[("s1", "A B"), ("s2", "B C"), ("s3", "A C")],
            &["A", "B", "C"],
            2,
        );
        r.ordering = ColoringOrder::LargestDegreeFirst;
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.conflicts, 0);
        assert_eq!(s.timetable.len(), 3);
    }

    #[test]
    fn triangle_in_one_day_reports_one_conflict() {
        let r = req(&[("s1", "A B C")], &["A", "B", "C"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.slots.len(), 2);
        assert_eq!(s.conflicts, 1);
        assert_eq!(s.overflow_count, 1);
        assert_eq!(s.overflow_courses, ids(&["C"]));
        assert_eq!(s.conflict_details.len(), 1);
        assert_eq!(s.conflict_details[0].courses.len(), 2);
        assert_eq!(s.conflict_details[0].slot_index, 0);
        insta::assert_json_snapshot!(s.timetable, @r###"
        {
          "Day 1, Slot 1 (9:00-12:00)": [
            "A",
            "C"
          ],
          "Day 1, Slot 2 (12.5:00-15.5:00)": [
            "B"
          ]
        }
        "###);
    }

    #[test]
    fn overflow_courses_follow_colored_ones_in_first_slot() {
        // C overflows; D is colored into slot 0 although it comes later.
        let r = req(&[("s1", "A B C")], &["A", "B", "C", "D"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.overflow_courses, ids(&["C"]));
        assert_eq!(
            s.timetable.values().next().unwrap(),
            &ids(&["A", "D", "C"])
        );
    }

    #[test]
    fn empty_course_list_is_an_empty_schedule() {
        let r = req(&[("s1", "A B")], &[], 3);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert!(s.timetable.is_empty());
        assert_eq!(s.conflicts, 0);
        assert!(s.conflict_details.is_empty());
        assert_eq!(s.slots.len(), 6);
    }

    #[test]
    fn empty_enrollment_packs_everything_in_first_slot() {
        let r = req(&[], &["A", "B", "C"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.timetable.len(), 1);
        assert_eq!(s.overflow_count, 0);
        assert_eq!(s.timetable.values().next().unwrap(), &ids(&["A", "B", "C"]));
    }

    #[test]
    fn courses_outside_list_are_excluded() {
        let r = req(&[("s1", "A X"), ("s2", "X B")], &["A", "B"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        let all: Vec<&CourseId> = s.timetable.values().flatten().collect();
        assert_eq!(all.len(), 2);
        assert!(!all.iter().any(|c| c.0 == "X"));
        assert_eq!(s.conflicts, 0);
    }

    #[test]
    fn duplicates_in_list_and_enrollment_collapse() {
        let r = req(&[("s1", "A A B")], &["A", "B", "A"], 1);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.timetable.values().flatten().count(), 2);
        assert_eq!(s.conflicts, 0);
    }

    #[test]
    fn mismatched_slots_per_day_is_informational() {
        let mut r = req(&[("s1", "A B")], &["A", "B"], 1);
        r.slots_per_day = Some(4);
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.stats["slotsPerDay"], 2);
        assert_eq!(s.stats["requestedSlotsPerDay"], 4);
        assert_eq!(s.slots.len(), 2);
    }

    #[test]
    fn custom_grid_changes_labels() {
        let mut r = req(&[("s1", "A B C")], &["A", "B", "C"], 1);
        r.grid = SlotGrid {
            exam_duration: Hour::whole(2),
            break_duration: Hour::whole(1),
            ..SlotGrid::default()
        };
        let s = schedule_exams(&r, &Limits::default()).unwrap();
        assert_eq!(s.conflicts, 0);
        assert_eq!(slot_of(&s, "C"), vec!["Day 1, Slot 3 (15:00-17:00)".to_string()]);
    }

    #[test]
    fn zero_days_is_rejected() {
        let r = req(&[], &["A"], 0);
        assert!(matches!(
            schedule_exams(&r, &Limits::default()),
            Err(ValidationError::Invalid(_))
        ));
    }

    fn arb_request() -> impl Strategy<Value = ExamRequest> {
        let course = (0usize..8).prop_map(|i| CourseId(format!("C{i}")));
        (
            proptest::collection::vec(
                ("s[0-9]{1,2}".prop_map(StudentId), proptest::collection::vec(course.clone(), 0..5)),
                0..25,
            )
            .prop_map(|rows| rows.into_iter().collect::<Enrollment>()),
            proptest::collection::vec(course, 0..10),
            1u32..4,
            any::<bool>(),
        )
            .prop_map(|(enrollment, course_list, days, by_degree)| ExamRequest {
                enrollment,
                course_list,
                days,
                slots_per_day: None,
                grid: SlotGrid::default(),
                ordering: if by_degree {
                    ColoringOrder::LargestDegreeFirst
                } else {
                    ColoringOrder::ListOrder
                },
            })
    }

    proptest! {
        #[test]
        fn every_listed_course_sits_in_exactly_one_slot(r in arb_request()) {
            let s = schedule_exams(&r, &Limits::default()).unwrap();
            for c in dedup_courses(&r.course_list) {
                let hits = s.timetable.values().flatten().filter(|x| **x == c).count();
                prop_assert_eq!(hits, 1);
            }
            prop_assert_eq!(
                s.timetable.values().map(Vec::len).sum::<usize>(),
                dedup_courses(&r.course_list).len()
            );
        }

        #[test]
        fn conflicts_total_matches_details(r in arb_request()) {
            let s = schedule_exams(&r, &Limits::default()).unwrap();
            let sum: usize = s.conflict_details.iter().map(|d| d.courses.len() - 1).sum();
            prop_assert_eq!(s.conflicts as usize, sum);
            prop_assert!(s.conflict_details.iter().all(|d| d.courses.len() >= 2));
        }

        #[test]
        fn no_overflow_means_no_conflicts(r in arb_request()) {
            let s = schedule_exams(&r, &Limits::default()).unwrap();
            if s.overflow_count == 0 {
                prop_assert_eq!(s.conflicts, 0);
            }
        }

        #[test]
        fn same_input_same_output(r in arb_request()) {
            let a = schedule_exams(&r, &Limits::default()).unwrap();
            let b = schedule_exams(&r, &Limits::default()).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
