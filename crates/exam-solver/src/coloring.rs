use crate::graph::ConflictGraph;
use std::cmp::Reverse;
use std::collections::HashSet;
use types::ColoringOrder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coloring {
    /// Slot index per graph vertex, overflow vertices already forced to 0.
    pub slot_of: Vec<usize>,
    /// Vertices that found no clash-free slot, in the order they were met.
    pub overflow: Vec<usize>,
}

impl Coloring {
    pub fn is_overflow(&self, i: usize) -> bool {
        self.overflow.contains(&i)
    }

    pub fn colors_used(&self) -> usize {
        self.slot_of.iter().collect::<HashSet<_>>().len()
    }
}

fn visit_order(graph: &ConflictGraph, ordering: ColoringOrder) -> Vec<usize> {
    let mut order: Vec<usize> = (0..graph.len()).collect();
    if ordering == ColoringOrder::LargestDegreeFirst {
        // stable: ties keep list order
        order.sort_by_key(|&i| Reverse(graph.degree(i)));
    }
    order
}

/// Greedy first-fit coloring with `total_slots` colors. A vertex whose
/// neighbours already hold every color is parked as overflow; it does not
/// block later vertices and lands in slot 0 once the pass is over.
pub fn color(graph: &ConflictGraph, total_slots: usize, ordering: ColoringOrder) -> Coloring {
    let mut assigned: Vec<Option<usize>> = vec![None; graph.len()];
    let mut overflow = Vec::new();

    for i in visit_order(graph, ordering) {
        let taken: HashSet<usize> = graph.neighbors(i).filter_map(|j| assigned[j]).collect();
        match (0..total_slots).find(|s| !taken.contains(s)) {
            Some(s) => assigned[i] = Some(s),
            None => overflow.push(i),
        }
    }

    Coloring {
        slot_of: assigned.into_iter().map(|s| s.unwrap_or(0)).collect(),
        overflow,
    }
}
