//! Fringe containers for the five search strategies.
//!
//! Every strategy shares one search loop; only the container behind the
//! fringe changes. Entries carry their own distance and parent snapshot so
//! the same milestone may sit on the fringe several times.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use roadmap_types::{MilestoneId, SearchStrategy};

/// A pending expansion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Entry {
    pub(crate) id: MilestoneId,
    pub(crate) distance: f64,
    pub(crate) parent: Option<MilestoneId>,
}

/// Heap slot ordered by ascending priority, then insertion order.
#[derive(Debug, Clone, Copy)]
struct Ranked {
    priority: f64,
    sequence: u64,
    entry: Entry,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    // Reversed: BinaryHeap is a max-heap
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

#[derive(Debug)]
pub(crate) enum Fringe {
    Stack(Vec<Entry>),
    Queue(VecDeque<Entry>),
    Priority {
        strategy: SearchStrategy,
        heap: BinaryHeap<Ranked>,
        sequence: u64,
    },
}

impl Fringe {
    pub(crate) fn new(strategy: SearchStrategy) -> Self {
        match strategy {
            SearchStrategy::DepthFirst => Self::Stack(Vec::new()),
            SearchStrategy::BreadthFirst => Self::Queue(VecDeque::new()),
            SearchStrategy::UniformCost
            | SearchStrategy::AStar
            | SearchStrategy::WeightedAStar { .. } => Self::Priority {
                strategy,
                heap: BinaryHeap::new(),
                sequence: 0,
            },
        }
    }

    /// Adds an entry; `heuristic` is only used by the prioritized strategies.
    pub(crate) fn push(&mut self, entry: Entry, heuristic: f64) {
        match self {
            Self::Stack(stack) => stack.push(entry),
            Self::Queue(queue) => queue.push_back(entry),
            Self::Priority {
                strategy,
                heap,
                sequence,
            } => {
                let priority = strategy
                    .priority(entry.distance, heuristic)
                    .unwrap_or(entry.distance);
                heap.push(Ranked {
                    priority,
                    sequence: *sequence,
                    entry,
                });
                *sequence += 1;
            }
        }
    }

    /// Removes the next entry, with its priority on the prioritized fringes.
    pub(crate) fn pop(&mut self) -> Option<(Entry, Option<f64>)> {
        match self {
            Self::Stack(stack) => stack.pop().map(|entry| (entry, None)),
            Self::Queue(queue) => queue.pop_front().map(|entry| (entry, None)),
            Self::Priority { heap, .. } => heap
                .pop()
                .map(|ranked| (ranked.entry, Some(ranked.priority))),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Stack(stack) => stack.len(),
            Self::Queue(queue) => queue.len(),
            Self::Priority { heap, .. } => heap.len(),
        }
    }
}
