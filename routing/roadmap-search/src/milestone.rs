//! Roadmap vertices.

use std::collections::BTreeSet;

use nalgebra::Point2;
use roadmap_types::{MilestoneId, SearchMark};

/// Per-search bookkeeping, reset at the start of every search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchState {
    pub(crate) distance_from_start: f64,
    pub(crate) heuristic_to_goal: f64,
    pub(crate) parent: Option<MilestoneId>,
    pub(crate) mark: SearchMark,
}

impl SearchState {
    pub(crate) const fn reset(heuristic_to_goal: f64) -> Self {
        Self {
            distance_from_start: 0.0,
            heuristic_to_goal,
            parent: None,
            mark: SearchMark::Unvisited,
        }
    }
}

/// A sampled point in free space and its roadmap edges.
///
/// Neighbour sets are kept symmetric by [`crate::Roadmap`]: if `a` lists `b`,
/// `b` lists `a`.
#[derive(Debug, Clone)]
pub struct Milestone {
    id: MilestoneId,
    position: Point2<f64>,
    neighbours: BTreeSet<MilestoneId>,
    slippery: bool,
    pub(crate) state: SearchState,
}

impl Milestone {
    pub(crate) const fn new(id: MilestoneId, position: Point2<f64>) -> Self {
        Self {
            id,
            position,
            neighbours: BTreeSet::new(),
            slippery: false,
            state: SearchState::reset(0.0),
        }
    }

    /// Returns the milestone id.
    #[must_use]
    pub const fn id(&self) -> MilestoneId {
        self.id
    }

    /// Returns the sampled position.
    #[must_use]
    pub const fn position(&self) -> Point2<f64> {
        self.position
    }

    /// Returns the connected milestones in ascending id order.
    pub fn neighbours(&self) -> impl ExactSizeIterator<Item = MilestoneId> + '_ {
        self.neighbours.iter().copied()
    }

    /// Returns the number of edges at this milestone.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.neighbours.len()
    }

    /// Returns `true` if `other` is connected to this milestone.
    #[must_use]
    pub fn is_connected_to(&self, other: MilestoneId) -> bool {
        self.neighbours.contains(&other)
    }

    /// Returns `true` if walkers should avoid this milestone.
    #[must_use]
    pub const fn is_slippery(&self) -> bool {
        self.slippery
    }

    /// Distance from the start along the route found by the last search.
    ///
    /// Only meaningful for milestones marked [`SearchMark::Explored`].
    #[must_use]
    pub const fn distance_from_start(&self) -> f64 {
        self.state.distance_from_start
    }

    /// Straight-line distance to the goal of the last search.
    #[must_use]
    pub const fn heuristic_to_goal(&self) -> f64 {
        self.state.heuristic_to_goal
    }

    /// Predecessor on the route found by the last search.
    #[must_use]
    pub const fn parent(&self) -> Option<MilestoneId> {
        self.state.parent
    }

    /// How the last search treated this milestone.
    #[must_use]
    pub const fn mark(&self) -> SearchMark {
        self.state.mark
    }

    pub(crate) fn connect(&mut self, other: MilestoneId) -> bool {
        self.neighbours.insert(other)
    }

    pub(crate) fn disconnect(&mut self, other: MilestoneId) -> bool {
        self.neighbours.remove(&other)
    }

    pub(crate) fn take_neighbours(&mut self) -> BTreeSet<MilestoneId> {
        std::mem::take(&mut self.neighbours)
    }

    pub(crate) const fn set_slippery(&mut self, slippery: bool) {
        self.slippery = slippery;
    }
}
