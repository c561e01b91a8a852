use crate::slots::generate_slots;
use crate::{validate_conflicts, Limits, ValidationError};
use std::collections::{BTreeMap, HashMap, HashSet};
use types::{ConflictDetail, ConflictReport, ConflictsRequest, CourseId, Enrollment};

/// A student's courses restricted to the scheduled list, first occurrence
/// wins, enrollment order kept.
pub fn courses_in_list<'a>(
    enrolled: &'a [CourseId],
    listed: &HashSet<&CourseId>,
) -> Vec<&'a CourseId> {
    let mut seen: HashSet<&CourseId> = HashSet::new();
    enrolled
        .iter()
        .filter(|c| listed.contains(c) && seen.insert(*c))
        .collect()
}

/// Measures student clashes for a finished assignment. Independent of how the
/// assignment was produced: every student with two or more listed courses in
/// one slot yields a detail and contributes `count - 1` to the total.
pub fn compute_conflicts(
    enrollment: &Enrollment,
    course_list: &[CourseId],
    slot_of: &HashMap<&CourseId, usize>,
) -> ConflictReport {
    let listed: HashSet<&CourseId> = course_list.iter().collect();
    let mut report = ConflictReport::default();

    for (student, enrolled) in enrollment {
        let mut by_slot: BTreeMap<usize, Vec<CourseId>> = BTreeMap::new();
        for course in courses_in_list(enrolled, &listed) {
            if let Some(&slot) = slot_of.get(course) {
                by_slot.entry(slot).or_default().push(course.clone());
            }
        }
        for (slot, courses) in by_slot {
            if courses.len() < 2 {
                continue;
            }
            report.conflicts += (courses.len() - 1) as u32;
            report.conflict_details.push(ConflictDetail {
                student: student.clone(),
                slot_index: slot,
                courses,
            });
        }
    }
    report
}

/// Conflict report for a timetable built elsewhere. Labels are resolved to
/// slot indices of the grid the request describes; a label that is not on
/// that grid, or a course placed twice, makes the request invalid.
pub fn timetable_conflicts(
    req: &ConflictsRequest,
    limits: &Limits,
) -> Result<ConflictReport, ValidationError> {
    validate_conflicts(req, limits)?;

    let index: HashMap<_, usize> = generate_slots(&req.grid, req.days)
        .into_iter()
        .enumerate()
        .map(|(i, slot)| (slot.label(), i))
        .collect();

    let mut errors = Vec::new();
    let mut course_list: Vec<CourseId> = Vec::new();
    let mut slot_index: HashMap<&CourseId, usize> = HashMap::new();
    for (label, courses) in &req.timetable {
        let Some(&i) = index.get(label) else {
            errors.push(format!("slot {label} is not part of the exam grid"));
            continue;
        };
        for course in courses {
            match slot_index.insert(course, i) {
                Some(prev) if prev != i => {
                    errors.push(format!("course {course} is placed in more than one slot"))
                }
                Some(_) => {}
                None => course_list.push(course.clone()),
            }
        }
    }
    if !errors.is_empty() {
        return Err(ValidationError::Invalid(errors));
    }
    Ok(compute_conflicts(&req.enrollment, &course_list, &slot_index))
}
