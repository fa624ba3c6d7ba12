//! Probabilistic roadmaps and graph search over planar free space.
//!
//! This crate grows a [`Roadmap`] over a `planar-space` configuration space
//! and searches it with any of the `roadmap-types` strategies.
//!
//! # Overview
//!
//! - **Growth** ([`Roadmap::grow`]): rejection-sample free points and connect
//!   each to every earlier milestone within the edge band whose connecting
//!   segment is collision-free
//! - **Search** ([`Roadmap::search`] and the per-strategy shorthands): insert
//!   start and goal as milestones, then expand the fringe until the goal is popped
//! - **Editing** ([`Roadmap::remove_milestones`], [`Roadmap::set_slippery`]):
//!   invalidate parts of the graph before replanning
//!
//! # Quick Start
//!
//! ```
//! use roadmap_search::Roadmap;
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea, SearchStrategy};
//! use planar_space::{ConfigurationSpace, Obstacle};
//! use nalgebra::Point2;
//!
//! // A wall with gaps at both ends
//! let obstacles = vec![Obstacle::segment(Point2::new(0.0, -30.0), Point2::new(0.0, 30.0)).unwrap()];
//! let space = ConfigurationSpace::new(&obstacles);
//!
//! let band = EdgeBand::new(0.0, 12.0).unwrap();
//! let config = GrowConfig::new(
//!     SamplingArea::new(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)).unwrap(),
//!     band,
//! )
//! .with_margin(0.5);
//!
//! let mut roadmap = Roadmap::with_seed(3);
//! roadmap.grow(400, &config, space).unwrap();
//!
//! let route = roadmap
//!     .search(SearchStrategy::AStar, Point2::new(-20.0, 0.0), Point2::new(20.0, 0.0), band, space)
//!     .unwrap();
//!
//! // Either a collision-free route or the start-only sentinel
//! let points: Vec<_> = route.points().collect();
//! assert!(!space.intersects_polyline(&points));
//! ```
//!
//! # Strategy Selection
//!
//! | Strategy | Fringe | Optimal | Notes |
//! |----------|--------|---------|-------|
//! | DFS | stack | no | Cheapest bookkeeping, winding routes |
//! | BFS | queue | fewest hops | Ignores edge lengths |
//! | UCS | priority `g` | yes | Explores in all directions |
//! | A* | priority `g + h` | yes | Euclidean heuristic is consistent |
//! | Weighted A* | priority `g + ε·h` | within `ε` | Fewer expansions as `ε` grows |

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod fringe;
pub mod milestone;
pub mod roadmap;
mod search;

// Re-export main types for convenience
pub use milestone::Milestone;
pub use roadmap::Roadmap;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
mod integration_tests {
    use super::*;
    use nalgebra::Point2;
    use pathfinding::prelude::dijkstra;
    use planar_space::{ConfigurationSpace, Obstacle};
    use roadmap_types::{EdgeBand, GrowConfig, MilestoneId, SamplingArea, SearchStrategy};

    /// Independent shortest-path oracle with costs scaled to `u64`.
    fn oracle_length(roadmap: &Roadmap, start: MilestoneId, goal: MilestoneId) -> Option<f64> {
        dijkstra(
            &start,
            |id| {
                let here = roadmap.milestone(*id).unwrap().position();
                roadmap
                    .neighbours(*id)
                    .map(|n| {
                        let there = roadmap.milestone(n).unwrap().position();
                        (n, ((there - here).norm() * 1000.0).round() as u64)
                    })
                    .collect::<Vec<_>>()
            },
            |id| *id == goal,
        )
        .map(|(_, cost)| {
            #[allow(clippy::cast_precision_loss)]
            let unscaled = cost as f64 / 1000.0;
            unscaled
        })
    }

    fn obstacle_field() -> Vec<Obstacle> {
        vec![
            Obstacle::circle(Point2::new(-20.0, 10.0), 8.0).unwrap(),
            Obstacle::circle(Point2::new(25.0, -15.0), 10.0).unwrap(),
            Obstacle::segment(Point2::new(0.0, -40.0), Point2::new(0.0, 25.0)).unwrap(),
        ]
    }

    /// UCS and A* agree with Dijkstra on a cluttered roadmap.
    #[test]
    fn test_optimal_strategies_match_dijkstra() {
        let obstacles = obstacle_field();
        let space = ConfigurationSpace::new(&obstacles);
        let band = EdgeBand::new(0.0, 14.0).unwrap();
        let config = GrowConfig::new(
            SamplingArea::new(Point2::new(-60.0, -60.0), Point2::new(60.0, 60.0)).unwrap(),
            band,
        )
        .with_margin(1.0);

        let mut roadmap = Roadmap::with_seed(77);
        roadmap.grow(500, &config, space).unwrap();

        let start = Point2::new(-45.0, -45.0);
        let goal = Point2::new(45.0, 45.0);

        for strategy in [SearchStrategy::UniformCost, SearchStrategy::AStar] {
            let route = roadmap.search(strategy, start, goal, band, space).unwrap();
            if route.is_unreachable() {
                continue;
            }
            let expected = oracle_length(
                &roadmap,
                route.start().unwrap().id,
                route.goal().unwrap().id,
            )
            .unwrap();
            let tolerance = 1e-3 * route.len() as f64;
            assert!(
                (route.length() - expected).abs() <= tolerance,
                "{}: {} vs {}",
                strategy.name(),
                route.length(),
                expected
            );
        }
    }

    /// Every strategy returns a collision-free, in-band route.
    #[test]
    fn test_all_strategies_avoid_obstacles() {
        let obstacles = obstacle_field();
        let space = ConfigurationSpace::new(&obstacles);
        let band = EdgeBand::new(0.0, 14.0).unwrap();
        let config = GrowConfig::new(
            SamplingArea::new(Point2::new(-60.0, -60.0), Point2::new(60.0, 60.0)).unwrap(),
            band,
        );

        let strategies = [
            SearchStrategy::DepthFirst,
            SearchStrategy::BreadthFirst,
            SearchStrategy::UniformCost,
            SearchStrategy::AStar,
            SearchStrategy::WeightedAStar { epsilon: 3.0 },
        ];

        for (seed, strategy) in (100..).zip(strategies) {
            let mut roadmap = Roadmap::with_seed(seed);
            roadmap.grow(400, &config, space).unwrap();
            let route = roadmap
                .search(strategy, Point2::new(-50.0, 0.0), Point2::new(50.0, 0.0), band, space)
                .unwrap();

            let points: Vec<_> = route.points().collect();
            assert!(!space.intersects_polyline(&points), "{}", strategy.name());
            for pair in points.windows(2) {
                assert!(band.contains((pair[1] - pair[0]).norm()));
            }
        }
    }

    /// A goal sealed inside a ring of walls is unreachable.
    #[test]
    fn test_sealed_goal_is_unreachable() {
        let corners = [
            Point2::new(30.0, 30.0),
            Point2::new(40.0, 30.0),
            Point2::new(40.0, 40.0),
            Point2::new(30.0, 40.0),
        ];
        let obstacles: Vec<Obstacle> = (0..4)
            .map(|i| Obstacle::segment(corners[i], corners[(i + 1) % 4]).unwrap())
            .collect();
        let space = ConfigurationSpace::new(&obstacles);
        let band = EdgeBand::new(0.0, 15.0).unwrap();
        let config = GrowConfig::new(
            SamplingArea::new(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)).unwrap(),
            band,
        );

        let mut roadmap = Roadmap::with_seed(5);
        roadmap.grow(300, &config, space).unwrap();
        let start = Point2::new(-40.0, -40.0);
        let route = roadmap.a_star(start, Point2::new(35.0, 35.0), band, space);

        assert!(route.is_unreachable());
        assert_eq!(route.start().unwrap().position, start);
        assert!(route.stats().explored() > 1);
    }
}
