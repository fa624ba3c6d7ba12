//! Core types for probabilistic roadmaps: milestones, configuration and routes.
//!
//! This crate provides the vocabulary shared by the roadmap planner and
//! its callers (limb controllers, replanners, renderers).
//!
//! # Overview
//!
//! - **Milestones**: stable ids ([`MilestoneId`]) and per-search marks ([`SearchMark`])
//! - **Configuration**: edge length band ([`EdgeBand`]), sampling rectangle
//!   ([`SamplingArea`]), growth settings ([`GrowConfig`]) and the five search
//!   strategies ([`SearchStrategy`])
//! - **Results**: ordered waypoints with statistics ([`Route`], [`SearchStats`])
//!
//! # Example
//!
//! ```
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea, SearchStrategy};
//! use nalgebra::Point2;
//!
//! let config = GrowConfig::new(
//!     SamplingArea::new(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0)).unwrap(),
//!     EdgeBand::new(0.0, 15.0).unwrap(),
//! )
//! .with_margin(1.0);
//! assert!(config.validate().is_ok());
//!
//! // Routes would be computed by the roadmap-search crate
//! let strategy = SearchStrategy::AStar;
//! assert!(strategy.is_prioritized());
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod milestone;
pub mod route;

// Re-export main types at crate root for convenience
pub use config::{EdgeBand, GrowConfig, SamplingArea, SearchStrategy};
pub use error::RoadmapError;
pub use milestone::{MilestoneId, SearchMark};
pub use route::{Route, SearchStats, Waypoint};

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod integration_tests {
    use super::*;
    use nalgebra::Point2;
    use std::time::Duration;

    /// Test that all types can be constructed and used together.
    #[test]
    fn test_full_workflow_types() {
        let area = SamplingArea::new(Point2::new(0.0, 0.0), Point2::new(20.0, 20.0)).unwrap();
        let band = EdgeBand::new(0.5, 6.0).unwrap();
        let config = GrowConfig::new(area, band)
            .with_margin(0.25)
            .with_slippery_probability(0.1);
        assert!(config.validate().is_ok());

        let strategy = SearchStrategy::weighted_a_star(2.0).unwrap();
        let route = Route::new(vec![
            Waypoint::new(MilestoneId::new(10), Point2::new(1.0, 1.0)),
            Waypoint::new(MilestoneId::new(3), Point2::new(5.0, 4.0)),
            Waypoint::new(MilestoneId::new(11), Point2::new(5.0, 8.0)),
        ])
        .with_stats(
            SearchStats::new(strategy)
                .with_explored(3)
                .with_elapsed(Duration::from_micros(15)),
        );

        assert!(!route.is_unreachable());
        assert!((route.length() - 9.0).abs() < 1e-12);
        assert!(route.points().all(|p| area.contains(p)));
        assert!(
            route
                .waypoints()
                .windows(2)
                .all(|w| band.contains((w[1].position - w[0].position).norm()))
        );
        assert_eq!(route.stats().strategy_name(), "Weighted A*");
    }

    /// Test error types.
    #[test]
    fn test_error_types() {
        let error = RoadmapError::SamplingExhausted { attempts: 10 };
        assert!(error.is_sampling_exhausted());

        let error = EdgeBand::new(2.0, 1.0).unwrap_err();
        assert!(matches!(error, RoadmapError::InvalidEdgeBand { .. }));

        let error = RoadmapError::UnknownMilestone(MilestoneId::new(1));
        assert!(error.is_unknown_milestone());
    }
}
