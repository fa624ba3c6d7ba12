//! Planar geometry and configuration space for inchworm.
//!
//! This crate provides the collision layer the roadmap planner and the limb
//! controllers share:
//!
//! - [`geometry`] - Angle wrapping, rotations, point-to-segment distance, guarded 2x2 solves
//! - [`Obstacle`] - Closed set of obstacle shapes ([`Circle`], [`Segment`])
//! - [`ConfigurationSpace`] - Borrowed obstacle set answering segment and point queries
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with no engine dependencies. Vectors and matrices
//! are `nalgebra` types with `f64` components.
//!
//! # Coordinate Systems
//!
//! All positions are abstract planar coordinates. Angles are radians,
//! counter-clockwise from the positive X axis, and wrapped into `(−π, π]`
//! by [`geometry::wrap_angle`].
//!
//! # Example
//!
//! ```
//! use planar_space::{ConfigurationSpace, Obstacle};
//! use nalgebra::Point2;
//!
//! let obstacles = vec![
//!     Obstacle::circle(Point2::new(20.0, 0.0), 5.0).unwrap(),
//!     Obstacle::segment(Point2::new(-10.0, -10.0), Point2::new(-10.0, 10.0)).unwrap(),
//! ];
//! let space = ConfigurationSpace::new(&obstacles);
//!
//! // Edge through the disc
//! assert!(space.intersects_segment(Point2::new(0.0, 0.0), Point2::new(30.0, 0.0)));
//!
//! // Sample rejected for being too close to the wall
//! assert!(space.intersects_point(Point2::new(-8.0, 0.0), 3.0));
//! assert!(!space.intersects_point(Point2::new(0.0, 0.0), 3.0));
//! ```
//!
//! # Features
//!
//! - `serde` - Serialize/deserialize obstacle types
//!
//! # Quality Standards
//!
//! - Zero clippy/doc warnings
//! - Zero `unwrap`/`expect` in library code

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
pub mod geometry;
mod obstacle;
mod space;

// Re-export core types
pub use error::SpaceError;
pub use obstacle::{Circle, Obstacle, Segment};
pub use space::ConfigurationSpace;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};
