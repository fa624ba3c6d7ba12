//! Graph search over a roadmap.
//!
//! Every strategy runs the same loop:
//!
//! 1. Insert `start` and `goal` as milestones, connected with the usual edge rule.
//! 2. Reset the search state of every milestone against `goal`.
//! 3. Seed the fringe with `start`.
//! 4. Pop an entry; skip it if already explored, otherwise fix its distance
//!    and parent. Stop if it is the goal; else push every unexplored neighbour.
//! 5. If the fringe drains, return the one-element route `[start]`.
//!
//! Only the fringe order differs between strategies (see
//! [`SearchStrategy`]). Parent pointers replace per-node route copies, so a
//! search uses constant memory per milestone.
//!
//! # Example
//!
//! ```
//! use roadmap_search::Roadmap;
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea};
//! use planar_space::ConfigurationSpace;
//! use nalgebra::Point2;
//!
//! let band = EdgeBand::new(0.0, 15.0).unwrap();
//! let config = GrowConfig::new(
//!     SamplingArea::new(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0)).unwrap(),
//!     band,
//! );
//! let space = ConfigurationSpace::empty();
//!
//! let mut roadmap = Roadmap::with_seed(42);
//! roadmap.grow(500, &config, space).unwrap();
//!
//! let start = Point2::new(-90.0, 90.0);
//! let goal = Point2::new(90.0, -90.0);
//! let route = roadmap.a_star(start, goal, band, space);
//!
//! if !route.is_unreachable() {
//!     assert_eq!(route.start().unwrap().position, start);
//!     assert_eq!(route.goal().unwrap().position, goal);
//! }
//! ```

use std::time::Instant;

use nalgebra::Point2;
use planar_space::ConfigurationSpace;
use roadmap_types::{
    EdgeBand, MilestoneId, RoadmapError, Route, SearchMark, SearchStats, SearchStrategy, Waypoint,
};
use tracing::{debug, info, warn};

use crate::fringe::{Entry, Fringe};
use crate::milestone::SearchState;
use crate::roadmap::Roadmap;

impl Roadmap {
    /// Searches from `start` to `goal` with the given strategy.
    ///
    /// `start` and `goal` stay in the roadmap as milestones afterwards; their
    /// ids are the first and last waypoint ids of a successful route.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEpsilon`] for a weighted A* factor below one.
    /// An unreachable goal is not an error: the returned route holds only `start`.
    pub fn search(
        &mut self,
        strategy: SearchStrategy,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Result<Route, RoadmapError> {
        strategy.validate()?;
        let timer = Instant::now();

        let start_id = self.add_milestone(start, band, space);
        let goal_id = self.add_milestone(goal, band, space);
        debug!(
            start = %start_id,
            goal = %goal_id,
            strategy = strategy.name(),
            "Inserted search endpoints"
        );

        self.reset_search(goal);

        let mut fringe = Fringe::new(strategy);
        fringe.push(
            Entry {
                id: start_id,
                distance: 0.0,
                parent: None,
            },
            (goal - start).norm(),
        );
        if let Some(m) = self.slot_mut(start_id) {
            m.state.mark = SearchMark::Fringe;
        }

        let mut explored = 0;
        let mut stale_pops = 0;
        let mut pushes = 1;
        let mut peak_fringe = fringe.len();
        let mut goal_priority = None;
        let mut neighbours = Vec::new();
        let mut found = false;

        while let Some((entry, priority)) = fringe.pop() {
            let Some(current) = self.slot_mut(entry.id) else {
                stale_pops += 1;
                continue;
            };
            if current.state.mark.is_explored() {
                stale_pops += 1;
                continue;
            }
            current.state.mark = SearchMark::Explored;
            current.state.distance_from_start = entry.distance;
            current.state.parent = entry.parent;
            explored += 1;

            if entry.id == goal_id {
                goal_priority = priority;
                found = true;
                break;
            }

            let here = current.position();
            neighbours.clear();
            neighbours.extend(current.neighbours());

            for &next in &neighbours {
                let Some(candidate) = self.slot_mut(next) else {
                    continue;
                };
                if candidate.state.mark.is_explored() {
                    continue;
                }
                candidate.state.mark = SearchMark::Fringe;
                let distance = entry.distance + (candidate.position() - here).norm();
                fringe.push(
                    Entry {
                        id: next,
                        distance,
                        parent: Some(entry.id),
                    },
                    candidate.state.heuristic_to_goal,
                );
                pushes += 1;
            }
            peak_fringe = peak_fringe.max(fringe.len());
        }

        let stats = SearchStats::new(strategy)
            .with_explored(explored)
            .with_stale_pops(stale_pops)
            .with_pushes(pushes)
            .with_peak_fringe(peak_fringe)
            .with_fringe_left(fringe.len())
            .with_goal_priority(goal_priority)
            .with_elapsed(timer.elapsed());

        if !found {
            warn!(
                strategy = strategy.name(),
                explored,
                "Goal unreachable, returning start-only route"
            );
            return Ok(Route::unreachable(Waypoint::new(start_id, start)).with_stats(stats));
        }

        let route = Route::new(self.trace_back(goal_id)).with_stats(stats);
        info!(
            strategy = strategy.name(),
            explored,
            stale_pops,
            peak_fringe,
            waypoints = route.len(),
            length = route.length(),
            "Search complete"
        );
        Ok(route)
    }

    /// Depth-first search (LIFO fringe).
    pub fn dfs(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Route {
        self.search_infallible(SearchStrategy::DepthFirst, start, goal, band, space)
    }

    /// Breadth-first search (FIFO fringe).
    pub fn bfs(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Route {
        self.search_infallible(SearchStrategy::BreadthFirst, start, goal, band, space)
    }

    /// Uniform-cost search, ordered by distance from start.
    pub fn ucs(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Route {
        self.search_infallible(SearchStrategy::UniformCost, start, goal, band, space)
    }

    /// A* with the Euclidean heuristic.
    ///
    /// Returns a shortest route in the roadmap graph when the goal is reachable.
    pub fn a_star(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Route {
        self.search_infallible(SearchStrategy::AStar, start, goal, band, space)
    }

    /// Weighted A*: priority `g + epsilon * h`.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEpsilon`] unless `epsilon` is finite and `>= 1`.
    pub fn weighted_a_star(
        &mut self,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
        epsilon: f64,
    ) -> Result<Route, RoadmapError> {
        let strategy = SearchStrategy::weighted_a_star(epsilon)?;
        self.search(strategy, start, goal, band, space)
    }

    /// Runs a parameter-free strategy, which cannot fail validation.
    fn search_infallible(
        &mut self,
        strategy: SearchStrategy,
        start: Point2<f64>,
        goal: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> Route {
        match self.search(strategy, start, goal, band, space) {
            Ok(route) => route,
            Err(error) => {
                warn!(%error, "Search rejected");
                Route::default()
            }
        }
    }

    fn reset_search(&mut self, goal: Point2<f64>) {
        let mut count = 0usize;
        for milestone in self.milestones_mut() {
            milestone.state = SearchState::reset((goal - milestone.position()).norm());
            count += 1;
        }
        debug!(milestones = count, "Reset search state");
    }

    /// Follows parent pointers from `goal_id` back to the start.
    fn trace_back(&self, goal_id: MilestoneId) -> Vec<Waypoint> {
        let mut waypoints = Vec::new();
        let mut cursor = Some(goal_id);
        while let Some(id) = cursor {
            let Some(milestone) = self.milestone(id) else {
                break;
            };
            waypoints.push(Waypoint::new(id, milestone.position()));
            cursor = milestone.parent();
        }
        waypoints.reverse();
        waypoints
    }
}
