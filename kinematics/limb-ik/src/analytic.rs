//! Closed-form inverse kinematics for a two-link planar arm.
//!
//! Uses the law of cosines: the first joint is the direction to the goal minus
//! the angle between that direction and the first link. The second joint is
//! the direction from the elbow to the goal, relative to the first link. Of
//! the two mirror solutions this always returns the one with the elbow on the
//! clockwise side of the pivot-goal line.
//!
//! # Example
//!
//! ```
//! use limb_ik::analytic::solve_analytic;
//! use limb_ik::chain::free_end;
//! use nalgebra::Point2;
//!
//! let pivot = Point2::new(0.0, 0.0);
//! let goal = Point2::new(12.0, 5.0);
//! let (q1, q2) = solve_analytic(pivot, [10.0, 8.0], goal).unwrap();
//!
//! let tip = free_end(pivot, &[10.0, 8.0], &[q1, q2]).unwrap();
//! assert!((tip - goal).norm() < 1e-9);
//! ```

use nalgebra::Point2;
use planar_space::geometry::wrap_angle;
use std::f64::consts::PI;

use crate::chain::check_lengths;
use crate::error::IkError;

/// Goals closer to the pivot than this are treated as coincident with it.
pub const COINCIDENT_EPSILON: f64 = 1e-6;

/// Slack allowed on the reachable annulus before a goal counts as out of reach.
pub const REACH_TOLERANCE: f64 = 1e-9;

/// Solves for the joint angles that put the free end exactly on `goal`.
///
/// Both returned angles are wrapped to `(-π, π]`. A goal coincident with the
/// pivot of an equal-length chain yields `(0, π)`.
///
/// # Errors
///
/// Returns [`IkError::NonPositiveLength`] for invalid link lengths and
/// [`IkError::OutOfReach`] when `goal` lies outside `[|l1 - l2|, l1 + l2]`.
pub fn solve_analytic(
    pivot: Point2<f64>,
    lengths: [f64; 2],
    goal: Point2<f64>,
) -> Result<(f64, f64), IkError> {
    check_lengths(&lengths)?;
    let [l1, l2] = lengths;
    let distance = (goal - pivot).norm();
    let min = (l1 - l2).abs();
    let max = l1 + l2;

    if distance < COINCIDENT_EPSILON && l1 == l2 {
        return Ok((0.0, PI));
    }
    if distance > max + REACH_TOLERANCE || distance < min - REACH_TOLERANCE {
        return Err(IkError::OutOfReach { distance, min, max });
    }
    Ok(law_of_cosines(pivot, l1, l2, goal))
}

/// Like [`solve_analytic`] but never fails on reach.
///
/// Goals beyond the outer radius stretch the chain straight toward them. Goals
/// inside the inner radius fold it back on itself along the goal direction.
///
/// # Errors
///
/// Returns [`IkError::NonPositiveLength`] for invalid link lengths.
pub fn solve_analytic_clamped(
    pivot: Point2<f64>,
    lengths: [f64; 2],
    goal: Point2<f64>,
) -> Result<(f64, f64), IkError> {
    check_lengths(&lengths)?;
    let [l1, l2] = lengths;
    if (goal - pivot).norm() < COINCIDENT_EPSILON && l1 == l2 {
        return Ok((0.0, PI));
    }
    Ok(law_of_cosines(pivot, l1, l2, goal))
}

fn law_of_cosines(pivot: Point2<f64>, l1: f64, l2: f64, goal: Point2<f64>) -> (f64, f64) {
    let offset = goal - pivot;
    let distance = offset.norm();

    let numerator = distance.mul_add(distance, l1.mul_add(l1, -(l2 * l2)));
    let denominator = 2.0 * distance * l1;
    let ratio = if denominator > 0.0 {
        (numerator / denominator).clamp(-1.0, 1.0)
    } else if numerator >= 0.0 {
        1.0
    } else {
        -1.0
    };

    let q1 = offset.y.atan2(offset.x) - ratio.acos();
    let (sin, cos) = q1.sin_cos();
    let q2 = l1.mul_add(-sin, offset.y).atan2(l1.mul_add(-cos, offset.x)) - q1;
    (wrap_angle(q1), wrap_angle(q2))
}
