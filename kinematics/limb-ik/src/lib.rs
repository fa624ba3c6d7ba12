//! Inverse kinematics for planar serial chains.
//!
//! A chain is described by a pivot, `N` link lengths and `N` relative joint
//! angles. This crate provides:
//!
//! - [`chain`]: forward kinematics (link ends, free end)
//! - [`analytic`]: closed-form solve for two links
//! - [`jacobian`]: the positional Jacobian plus transpose and pseudo-inverse steps
//! - [`IkMethod`]: runtime choice between the iterative steps
//!
//! Iterative steps are directions in joint space; callers scale them by a
//! timestep and apply their own speed limits.
//!
//! # Quick Start
//!
//! ```
//! use limb_ik::{chain::free_end, IkMethod};
//! use nalgebra::Point2;
//!
//! let pivot = Point2::origin();
//! let lengths = [3.0, 2.0];
//! let goal = Point2::new(1.0, 3.0);
//! let mut angles = vec![0.2, 0.4];
//!
//! for _ in 0..200 {
//!     let step = IkMethod::pseudo_inverse(0.0)
//!         .step(pivot, &lengths, &angles, goal)
//!         .unwrap();
//!     for (angle, delta) in angles.iter_mut().zip(step.iter()) {
//!         *angle += 0.1 * delta;
//!     }
//! }
//!
//! let tip = free_end(pivot, &lengths, &angles).unwrap();
//! assert!((tip - goal).norm() < 1e-3);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

pub mod analytic;
pub mod chain;
mod error;
pub mod jacobian;
mod method;

// Re-export main types for convenience
pub use analytic::{solve_analytic, solve_analytic_clamped};
pub use error::IkError;
pub use method::IkMethod;
