//! Jacobian-based iterative IK steps.
//!
//! For a planar chain with joints at `p0..p(N-1)` and free end `e`, column `i`
//! of the 2×N positional Jacobian is the velocity of `e` per unit rotation of
//! joint `i`: `(-(e - pi).y, (e - pi).x)`.
//!
//! Both steps return a joint-space direction, not a scaled update. The caller
//! multiplies by the timestep and applies speed limits.
//!
//! # Example
//!
//! ```
//! use limb_ik::jacobian::jacobian_transpose_step;
//! use nalgebra::Point2;
//!
//! // A straight arm along +x with the goal straight above the tip
//! let step = jacobian_transpose_step(
//!     Point2::origin(),
//!     &[1.0, 1.0],
//!     &[0.0, 0.0],
//!     Point2::new(2.0, 1.0),
//! )
//! .unwrap();
//!
//! // Both joints rotate counter-clockwise, the base one faster
//! assert!(step[0] > step[1] && step[1] > 0.0);
//! ```

use nalgebra::{DVector, Matrix2, Matrix2xX, Point2, Vector2};
use planar_space::geometry::SINGULAR_EPSILON;
use tracing::warn;

use crate::chain::link_ends;
use crate::error::IkError;

/// Builds the positional Jacobian from the `N + 1` link ends of a chain.
///
/// `ends[0]` is the pivot and the last element is the free end. An input with
/// fewer than two points yields a 2×0 matrix.
#[must_use]
pub fn jacobian(ends: &[Point2<f64>]) -> Matrix2xX<f64> {
    let Some((free, joints)) = ends.split_last() else {
        return Matrix2xX::zeros(0);
    };
    Matrix2xX::from_fn(joints.len(), |row, col| {
        let arm = free - joints[col];
        if row == 0 { -arm.y } else { arm.x }
    })
}

/// Jacobian-transpose step `Jᵀ · (goal - e)`.
///
/// # Errors
///
/// Returns an error if the shapes of `lengths` and `angles` differ or are empty.
pub fn jacobian_transpose_step(
    pivot: Point2<f64>,
    lengths: &[f64],
    angles: &[f64],
    goal: Point2<f64>,
) -> Result<DVector<f64>, IkError> {
    let ends = link_ends(pivot, lengths, angles)?;
    let (error, j) = residual(&ends, goal);
    Ok(j.transpose() * error)
}

/// Damped pseudo-inverse step `Jᵀ · (J·Jᵀ + λ²I)⁻¹ · (goal - e)`.
///
/// With `damping = 0` this is the plain Moore-Penrose step. When the
/// determinant of the damped `J·Jᵀ` falls below the singularity threshold
/// the step is the zero vector.
///
/// # Errors
///
/// Returns an error if the shapes of `lengths` and `angles` differ or are empty.
pub fn pseudo_inverse_step(
    pivot: Point2<f64>,
    lengths: &[f64],
    angles: &[f64],
    goal: Point2<f64>,
    damping: f64,
) -> Result<DVector<f64>, IkError> {
    let ends = link_ends(pivot, lengths, angles)?;
    let (error, j) = residual(&ends, goal);

    let jjt: Matrix2<f64> = &j * j.transpose() + Matrix2::identity() * (damping * damping);
    let det = jjt.determinant();
    let inverse = if det.abs() < SINGULAR_EPSILON {
        None
    } else {
        jjt.try_inverse()
    };

    match inverse {
        Some(inverse) => Ok(j.transpose() * (inverse * error)),
        None => {
            warn!(det, damping, "Singular Jacobian, pseudo-inverse step is zero");
            Ok(DVector::zeros(lengths.len()))
        }
    }
}

fn residual(ends: &[Point2<f64>], goal: Point2<f64>) -> (Vector2<f64>, Matrix2xX<f64>) {
    let free = ends.last().copied().unwrap_or(goal);
    (goal - free, jacobian(ends))
}
