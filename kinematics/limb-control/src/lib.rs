//! Pivot-switching limb controllers that walk roadmap routes.
//!
//! A limb is a planar serial chain anchored at one end. It reaches for a
//! goal with iterative IK, then swaps its anchored end so the chain can
//! advance end over end along a route of roadmap milestones.
//!
//! # Overview
//!
//! - [`LimbChain`]: the `N`-link chain with `spawn`, `update` and `switch_pivot`
//! - [`RouteFollower`]: walks a [`roadmap_types::Route`] one waypoint per pivot switch
//! - [`AnalyticReacher`]: two-link walker driven by closed-form joint targets
//! - [`Creature`]: several limbs on one body, planting in turn
//! - [`Replanner`]: drops unsafe milestones and re-searches the roadmap
//!
//! # Quick Start
//!
//! ```
//! use limb_control::{FollowerConfig, LimbConfig, RouteFollower};
//! use planar_space::ConfigurationSpace;
//! use roadmap_search::Roadmap;
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea};
//! use nalgebra::Point2;
//!
//! let band = EdgeBand::new(0.0, 8.0).unwrap();
//! let config = GrowConfig::new(
//!     SamplingArea::new(Point2::new(-30.0, -30.0), Point2::new(30.0, 30.0)).unwrap(),
//!     band,
//! );
//! let space = ConfigurationSpace::empty();
//! let mut roadmap = Roadmap::with_seed(8);
//! roadmap.grow(200, &config, space).unwrap();
//!
//! let route = roadmap.a_star(Point2::new(-25.0, 0.0), Point2::new(25.0, 0.0), band, space);
//! assert!(!route.is_unreachable());
//!
//! let follower_config = FollowerConfig::default().with_limb(LimbConfig::default().with_seed(2));
//! let mut follower = RouteFollower::new(vec![4.0, 4.0, 4.0], vec![0.6, -0.6, -0.6], follower_config).unwrap();
//! follower.spawn(route).unwrap();
//! assert_eq!(follower.limb().pivot(), Point2::new(-25.0, 0.0));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod analytic;
pub mod config;
mod creature;
mod error;
mod follower;
mod limb;
mod replan;

// Re-export main types for convenience
pub use analytic::AnalyticReacher;
pub use config::{
    AnalyticConfig, CreatureConfig, EnergyConfig, FollowerConfig, LimbConfig, ReplanConfig,
};
pub use creature::{Creature, Gait};
pub use error::LimbError;
pub use follower::RouteFollower;
pub use limb::LimbChain;
pub use replan::{ReplanOutcome, ReplanReason, Replanner};
