// src/core/indexing/balltree/candidates.rs

//! Bounded best-k candidate set for nearest-neighbor search.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::core::dataset::ElementId;

/// One result of a k-nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Neighbor {
    pub id: ElementId,
    pub distance: f64,
}

/// A heap entry. `element == None` is a sentinel that sits infinitely far away.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    distance: f64,
    element: Option<ElementId>,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Max-heap order: the worst candidate (largest distance) is on top.
// Sentinels sort above real elements at equal distance, so an element at
// infinite distance still finds a sentinel on top to replace.
impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.element.is_none().cmp(&other.element.is_none()))
            .then_with(|| self.element.cmp(&other.element))
    }
}

/// Keeps the `k` closest elements seen so far.
///
/// The heap starts with `k` sentinels, so nothing is excluded until `k` real
/// elements have been offered.
#[derive(Debug)]
pub(super) struct BoundedCandidates {
    heap: BinaryHeap<Candidate>,
}

impl BoundedCandidates {
    pub(super) fn new(k: usize) -> Self {
        let mut heap = BinaryHeap::with_capacity(k);
        heap.extend(std::iter::repeat(Candidate { distance: f64::INFINITY, element: None }).take(k));
        Self { heap }
    }

    /// Whether no element at distance `bound` or more can still be kept.
    ///
    /// Never true while a sentinel is left, since any element fills it.
    pub(super) fn excludes(&self, bound: f64) -> bool {
        self.heap.peek().map_or(true, |top| top.element.is_some() && bound >= top.distance)
    }

    /// Replaces the current worst entry if `distance` beats it. A sentinel
    /// is beaten by any distance.
    pub(super) fn offer(&mut self, element: ElementId, distance: f64) -> bool {
        match self.heap.peek_mut() {
            Some(mut top) if top.element.is_none() || distance < top.distance => {
                *top = Candidate { distance, element: Some(element) };
                // Dropping `top` restores the heap order.
                drop(top);
                true
            }
            _ => false,
        }
    }

    /// Results ordered closest first, sentinels removed.
    pub(super) fn into_neighbors(self) -> Vec<Neighbor> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .filter_map(|c| c.element.map(|id| Neighbor { id, distance: c.distance }))
            .collect()
    }
}
