use sched_core::conflicts::courses_in_list;
use std::collections::{BTreeSet, HashMap, HashSet};
use types::{CourseId, Enrollment};

/// Undirected clash graph over the scheduled courses. Vertex `i` is the
/// `i`-th course of the list it was built from.
#[derive(Clone, Debug)]
pub struct ConflictGraph {
    courses: Vec<CourseId>,
    index: HashMap<CourseId, usize>,
    adj: Vec<BTreeSet<usize>>,
}

impl ConflictGraph {
    /// `courses` must already be free of duplicates.
    pub fn build(enrollment: &Enrollment, courses: &[CourseId]) -> Self {
        let index: HashMap<CourseId, usize> = courses
            .iter()
            .enumerate()
            .map(|(i, c)| (c.clone(), i))
            .collect();
        let mut adj = vec![BTreeSet::new(); courses.len()];
        let listed: HashSet<&CourseId> = courses.iter().collect();

        for enrolled in enrollment.values() {
            let taken: Vec<usize> = courses_in_list(enrolled, &listed)
                .into_iter()
                .filter_map(|c| index.get(c).copied())
                .collect();
            for (k, &a) in taken.iter().enumerate() {
                for &b in &taken[k + 1..] {
                    adj[a].insert(b);
                    adj[b].insert(a);
                }
            }
        }

        Self {
            courses: courses.to_vec(),
            index,
            adj,
        }
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    pub fn course(&self, i: usize) -> &CourseId {
        &self.courses[i]
    }

    pub fn index_of(&self, course: &CourseId) -> Option<usize> {
        self.index.get(course).copied()
    }

    pub fn neighbors(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.adj[i].iter().copied()
    }

    pub fn degree(&self, i: usize) -> usize {
        self.adj[i].len()
    }

    pub fn edge_count(&self) -> usize {
        self.adj.iter().map(BTreeSet::len).sum::<usize>() / 2
    }

    pub fn conflicts(&self, a: &CourseId, b: &CourseId) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(i), Some(j)) => self.adj[i].contains(&j),
            _ => false,
        }
    }
}
