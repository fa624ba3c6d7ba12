//! Route types combining waypoints with search metadata.
//!
//! This module defines the [`Route`] type returned by every roadmap search:
//! the ordered milestones from start to goal plus [`SearchStats`].
//!
//! # Example
//!
//! ```
//! use roadmap_types::{MilestoneId, Route, SearchStats, SearchStrategy, Waypoint};
//! use nalgebra::Point2;
//!
//! let route = Route::new(vec![
//!     Waypoint::new(MilestoneId::new(0), Point2::new(0.0, 0.0)),
//!     Waypoint::new(MilestoneId::new(4), Point2::new(3.0, 4.0)),
//! ])
//! .with_stats(SearchStats::new(SearchStrategy::AStar).with_explored(2));
//!
//! assert!(!route.is_unreachable());
//! assert!((route.length() - 5.0).abs() < 1e-12);
//! ```

use std::time::Duration;

use nalgebra::Point2;

use crate::config::SearchStrategy;
use crate::milestone::MilestoneId;

/// Counters from one run of the shared search loop.
///
/// A milestone can sit on the fringe several times, so `pops` is
/// `explored + stale_pops` and may exceed the milestone count. For the
/// prioritized strategies the goal is popped at priority `g + ε·0`, which
/// is the cost of the returned route.
///
/// # Example
///
/// ```
/// use roadmap_types::{SearchStats, SearchStrategy};
/// use std::time::Duration;
///
/// let stats = SearchStats::new(SearchStrategy::BreadthFirst)
///     .with_explored(1500)
///     .with_stale_pops(20)
///     .with_peak_fringe(64)
///     .with_elapsed(Duration::from_millis(3));
/// assert_eq!(stats.strategy_name(), "BFS");
/// assert_eq!(stats.pops(), 1520);
/// assert!(stats.goal_priority().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchStats {
    strategy: SearchStrategy,
    /// Milestones popped and expanded.
    explored: usize,
    /// Pops discarded because the milestone was already explored or removed.
    stale_pops: usize,
    /// Entries pushed, including the start.
    pushes: usize,
    /// Largest fringe length seen.
    peak_fringe: usize,
    /// Entries left on the fringe when the search stopped.
    fringe_left: usize,
    /// Priority of the goal entry when it was popped.
    goal_priority: Option<f64>,
    /// Wall time of the search, including start/goal insertion.
    time_elapsed: Duration,
}

impl SearchStats {
    /// Creates zeroed statistics for `strategy`.
    #[must_use]
    pub fn new(strategy: SearchStrategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    /// Sets the number of explored milestones.
    #[must_use]
    pub const fn with_explored(mut self, count: usize) -> Self {
        self.explored = count;
        self
    }

    /// Sets the number of discarded pops.
    #[must_use]
    pub const fn with_stale_pops(mut self, count: usize) -> Self {
        self.stale_pops = count;
        self
    }

    /// Sets the number of pushes.
    #[must_use]
    pub const fn with_pushes(mut self, count: usize) -> Self {
        self.pushes = count;
        self
    }

    /// Sets the peak fringe length.
    #[must_use]
    pub const fn with_peak_fringe(mut self, size: usize) -> Self {
        self.peak_fringe = size;
        self
    }

    /// Sets the fringe length at completion.
    #[must_use]
    pub const fn with_fringe_left(mut self, size: usize) -> Self {
        self.fringe_left = size;
        self
    }

    /// Sets the goal's pop priority.
    #[must_use]
    pub const fn with_goal_priority(mut self, priority: Option<f64>) -> Self {
        self.goal_priority = priority;
        self
    }

    /// Sets the time elapsed.
    #[must_use]
    pub const fn with_elapsed(mut self, duration: Duration) -> Self {
        self.time_elapsed = duration;
        self
    }

    /// Returns the strategy that produced these counters.
    #[must_use]
    pub const fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Returns the strategy's display name.
    #[must_use]
    pub const fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Returns the number of explored milestones.
    #[must_use]
    pub const fn explored(&self) -> usize {
        self.explored
    }

    /// Returns the number of discarded pops.
    #[must_use]
    pub const fn stale_pops(&self) -> usize {
        self.stale_pops
    }

    /// Returns every pop, expanded or discarded.
    #[must_use]
    pub const fn pops(&self) -> usize {
        self.explored + self.stale_pops
    }

    /// Returns the number of pushes.
    #[must_use]
    pub const fn pushes(&self) -> usize {
        self.pushes
    }

    /// Returns the peak fringe length.
    #[must_use]
    pub const fn peak_fringe(&self) -> usize {
        self.peak_fringe
    }

    /// Returns the fringe length at completion.
    #[must_use]
    pub const fn fringe_left(&self) -> usize {
        self.fringe_left
    }

    /// Returns the goal's pop priority, `None` for stack and queue fringes
    /// or when the goal was never reached.
    #[must_use]
    pub const fn goal_priority(&self) -> Option<f64> {
        self.goal_priority
    }

    /// Returns the time taken.
    #[must_use]
    pub const fn time_elapsed(&self) -> Duration {
        self.time_elapsed
    }
}

/// One milestone on a route.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    /// Milestone the waypoint came from.
    pub id: MilestoneId,
    /// Position of that milestone.
    pub position: Point2<f64>,
}

impl Waypoint {
    /// Creates a waypoint.
    #[must_use]
    pub const fn new(id: MilestoneId, position: Point2<f64>) -> Self {
        Self { id, position }
    }
}

/// A search result: ordered waypoints from start to goal.
///
/// A route with a single waypoint (the start) means the goal was
/// unreachable; check [`Route::is_unreachable`] before following it.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Waypoints in travel order.
    waypoints: Vec<Waypoint>,
    /// Statistics about the search that produced the route.
    stats: SearchStats,
}

impl Route {
    /// Creates a route from waypoints in travel order.
    #[must_use]
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self {
            waypoints,
            stats: SearchStats::default(),
        }
    }

    /// Creates the failure sentinel: a route holding only `start`.
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_types::{MilestoneId, Route, Waypoint};
    /// use nalgebra::Point2;
    ///
    /// let start = Waypoint::new(MilestoneId::new(9), Point2::new(1.0, 1.0));
    /// let route = Route::unreachable(start);
    /// assert!(route.is_unreachable());
    /// assert_eq!(route.len(), 1);
    /// ```
    #[must_use]
    pub fn unreachable(start: Waypoint) -> Self {
        Self::new(vec![start])
    }

    /// Sets the search statistics.
    #[must_use]
    pub fn with_stats(mut self, stats: SearchStats) -> Self {
        self.stats = stats;
        self
    }

    /// Returns the waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Returns the waypoint positions in order.
    pub fn points(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.waypoints.iter().map(|w| w.position)
    }

    /// Returns the milestone ids in order.
    pub fn ids(&self) -> impl Iterator<Item = MilestoneId> + '_ {
        self.waypoints.iter().map(|w| w.id)
    }

    /// Returns the waypoint at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    /// Returns the first waypoint.
    #[must_use]
    pub fn start(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    /// Returns the last waypoint.
    #[must_use]
    pub fn goal(&self) -> Option<&Waypoint> {
        self.waypoints.last()
    }

    /// Returns the search statistics.
    #[must_use]
    pub const fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Returns the number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Returns `true` if the route has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Returns `true` if the route is the one-element failure sentinel (or empty).
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        self.waypoints.len() < 2
    }

    /// Summed Euclidean length of consecutive waypoint pairs.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| (pair[1].position - pair[0].position).norm())
            .sum()
    }

    /// Consumes the route and returns the waypoints.
    #[must_use]
    pub fn into_waypoints(self) -> Vec<Waypoint> {
        self.waypoints
    }
}
