//! Forward kinematics for planar serial chains.
//!
//! A chain is a pivot plus `N` links. Link `i` has length `lengths[i]` and
//! sits at world angle `angles[0] + ... + angles[i]`; each joint angle is
//! relative to the previous link.
//!
//! # Example
//!
//! ```
//! use limb_ik::chain::{free_end, link_ends};
//! use nalgebra::Point2;
//! use std::f64::consts::FRAC_PI_2;
//!
//! let pivot = Point2::new(1.0, 1.0);
//! let ends = link_ends(pivot, &[2.0, 3.0], &[0.0, FRAC_PI_2]).unwrap();
//!
//! assert_eq!(ends.len(), 3);
//! assert_eq!(ends[0], pivot);
//! assert!((ends[1] - Point2::new(3.0, 1.0)).norm() < 1e-12);
//! assert!((ends[2] - Point2::new(3.0, 4.0)).norm() < 1e-12);
//!
//! let tip = free_end(pivot, &[2.0, 3.0], &[0.0, FRAC_PI_2]).unwrap();
//! assert_eq!(tip, ends[2]);
//! ```

use nalgebra::{Point2, Vector2};

use crate::error::IkError;

/// Checks that `lengths` and `angles` describe the same non-empty chain.
///
/// # Errors
///
/// Returns [`IkError::EmptyChain`] or [`IkError::LengthMismatch`].
pub fn check_shape(lengths: &[f64], angles: &[f64]) -> Result<(), IkError> {
    if lengths.len() != angles.len() {
        return Err(IkError::LengthMismatch {
            lengths: lengths.len(),
            angles: angles.len(),
        });
    }
    if lengths.is_empty() {
        return Err(IkError::EmptyChain);
    }
    Ok(())
}

/// Checks that every link length is finite and strictly positive.
///
/// # Errors
///
/// Returns [`IkError::NonPositiveLength`] for the first offending link.
pub fn check_lengths(lengths: &[f64]) -> Result<(), IkError> {
    match lengths
        .iter()
        .enumerate()
        .find(|(_, l)| !l.is_finite() || **l <= 0.0)
    {
        Some((index, &length)) => Err(IkError::NonPositiveLength { index, length }),
        None => Ok(()),
    }
}

/// Returns the pivot followed by the far end of every link (`N + 1` points).
///
/// # Errors
///
/// Returns an error if the shapes of `lengths` and `angles` differ or are empty.
pub fn link_ends(
    pivot: Point2<f64>,
    lengths: &[f64],
    angles: &[f64],
) -> Result<Vec<Point2<f64>>, IkError> {
    check_shape(lengths, angles)?;

    let mut ends = Vec::with_capacity(lengths.len() + 1);
    ends.push(pivot);
    let mut end = pivot;
    let mut world_angle = 0.0;
    for (length, angle) in lengths.iter().zip(angles) {
        world_angle += angle;
        let (sin, cos) = f64::sin_cos(world_angle);
        end += Vector2::new(length * cos, length * sin);
        ends.push(end);
    }
    Ok(ends)
}

/// Returns the position of the chain's free end.
///
/// # Errors
///
/// Returns an error if the shapes of `lengths` and `angles` differ or are empty.
pub fn free_end(pivot: Point2<f64>, lengths: &[f64], angles: &[f64]) -> Result<Point2<f64>, IkError> {
    let ends = link_ends(pivot, lengths, angles)?;
    Ok(ends.last().copied().unwrap_or(pivot))
}

/// Returns the total length of the chain.
#[must_use]
pub fn reach(lengths: &[f64]) -> f64 {
    lengths.iter().sum()
}
