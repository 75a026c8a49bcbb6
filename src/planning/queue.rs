//! Min-priority queue of cell indices keyed by cost.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Clone, Copy, Debug)]
struct QueueEntry {
    cost: f32,
    index: usize,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cost
            .total_cmp(&other.cost)
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cells waiting to be expanded, cheapest first.
///
/// A cell may be pushed again when its cost improves; the propagator
/// discards the stale entry when it is popped after the cell has settled.
#[derive(Clone, Debug, Default)]
pub struct CostQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
}

impl CostQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a cell at the given cost.
    #[inline]
    pub fn push(&mut self, index: usize, cost: f32) {
        self.heap.push(Reverse(QueueEntry { cost, index }));
    }

    /// Remove the cheapest entry as `(index, cost)`.
    #[inline]
    pub fn pop(&mut self) -> Option<(usize, f32)> {
        self.heap.pop().map(|Reverse(e)| (e.index, e.cost))
    }

    /// Number of queued entries, stale ones included.
    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Is the queue empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
