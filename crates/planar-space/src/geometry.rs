//! Planar geometry helpers.
//!
//! Vector and matrix arithmetic comes straight from `nalgebra`
//! (`Point2`, `Vector2`, `Matrix2`). This module adds the handful of
//! operations the planner and the IK engine share: angle wrapping,
//! rotation matrices, point-to-segment distance and a guarded 2x2 solve.
//!
//! Every function is pure and returns a fresh value.
//!
//! # Example
//!
//! ```
//! use planar_space::geometry::{distance_to_segment, wrap_angle};
//! use nalgebra::Point2;
//! use std::f64::consts::PI;
//!
//! let d = distance_to_segment(
//!     Point2::new(0.0, 1.0),
//!     Point2::new(-1.0, 0.0),
//!     Point2::new(1.0, 0.0),
//! );
//! assert!((d - 1.0).abs() < 1e-12);
//!
//! assert!((wrap_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
//! ```

use std::f64::consts::{PI, TAU};

use nalgebra::{Matrix2, Point2, Vector2};

/// Determinants with magnitude below this are treated as singular.
pub const SINGULAR_EPSILON: f64 = 1e-6;

/// Wraps an angle in radians into the half-open interval `(−π, π]`.
///
/// # Example
///
/// ```
/// use planar_space::geometry::wrap_angle;
/// use std::f64::consts::PI;
///
/// assert_eq!(wrap_angle(PI), PI);
/// assert_eq!(wrap_angle(-PI), PI);
/// assert!((wrap_angle(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
/// ```
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// Returns the counter-clockwise rotation matrix for `theta` radians.
///
/// # Example
///
/// ```
/// use planar_space::geometry::rotation;
/// use nalgebra::Vector2;
/// use std::f64::consts::FRAC_PI_2;
///
/// let v = rotation(FRAC_PI_2) * Vector2::x();
/// assert!((v - Vector2::y()).norm() < 1e-12);
/// ```
#[must_use]
pub fn rotation(theta: f64) -> Matrix2<f64> {
    let (sin, cos) = theta.sin_cos();
    Matrix2::new(cos, -sin, sin, cos)
}

/// The z component of the 3D cross product of two planar vectors.
#[must_use]
pub fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x.mul_add(b.y, -(a.y * b.x))
}

/// Normalizes `v`, returning the zero vector when `v` has no length.
#[must_use]
pub fn unit_or_zero(v: &Vector2<f64>) -> Vector2<f64> {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vector2::zeros)
}

/// Returns the point on the closed segment `a`-`b` nearest to `p`.
///
/// A degenerate segment (`a == b`) yields `a`.
#[must_use]
pub fn closest_point_on_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> Point2<f64> {
    let dir = b - a;
    let len_sq = dir.norm_squared();
    if len_sq == 0.0 {
        return a;
    }
    let t = ((p - a).dot(&dir) / len_sq).clamp(0.0, 1.0);
    a + dir * t
}

/// Distance from `p` to the closed segment `a`-`b`.
///
/// # Example
///
/// ```
/// use planar_space::geometry::distance_to_segment;
/// use nalgebra::Point2;
///
/// // Beyond the endpoint the distance is measured to the endpoint
/// let d = distance_to_segment(
///     Point2::new(4.0, 4.0),
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
/// );
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn distance_to_segment(p: Point2<f64>, a: Point2<f64>, b: Point2<f64>) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}

/// Solves `m * x = rhs`, returning `None` when `|det(m)|` is below `epsilon`.
///
/// # Example
///
/// ```
/// use planar_space::geometry::solve_2x2;
/// use nalgebra::{Matrix2, Vector2};
///
/// let m = Matrix2::new(2.0, 0.0, 0.0, 4.0);
/// let x = solve_2x2(&m, &Vector2::new(2.0, 2.0), 1e-9).unwrap();
/// assert!((x - Vector2::new(1.0, 0.5)).norm() < 1e-12);
///
/// let singular = Matrix2::new(1.0, 2.0, 2.0, 4.0);
/// assert!(solve_2x2(&singular, &Vector2::new(1.0, 1.0), 1e-9).is_none());
/// ```
#[must_use]
pub fn solve_2x2(m: &Matrix2<f64>, rhs: &Vector2<f64>, epsilon: f64) -> Option<Vector2<f64>> {
    if m.determinant().abs() < epsilon {
        return None;
    }
    m.try_inverse().map(|inv| inv * rhs)
}

/// Returns `true` if every coordinate of `p` is finite.
#[must_use]
pub fn is_finite_point(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_wrap_angle_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..1000 {
            let angle: f64 = rng.gen_range(-50.0..50.0);
            let wrapped = wrap_angle(angle);
            assert!(wrapped > -PI && wrapped <= PI, "{angle} -> {wrapped}");
            // Same direction after wrapping
            assert_relative_eq!(wrapped.sin(), angle.sin(), epsilon = 1e-9);
            assert_relative_eq!(wrapped.cos(), angle.cos(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_wrap_angle_boundaries() {
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(PI), PI);
        assert_eq!(wrap_angle(-PI), PI);
        assert_relative_eq!(wrap_angle(TAU), 0.0, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-FRAC_PI_2), -FRAC_PI_2);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = rotation(0.7);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(r * r.transpose(), Matrix2::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_instances_are_independent() {
        let a = rotation(0.3);
        let b = rotation(1.2);
        assert_relative_eq!(a * b, rotation(1.5), epsilon = 1e-12);
        assert_relative_eq!(a, rotation(0.3));
    }

    #[test]
    fn test_cross_sign() {
        assert_eq!(cross(&Vector2::x(), &Vector2::y()), 1.0);
        assert_eq!(cross(&Vector2::y(), &Vector2::x()), -1.0);
        assert_eq!(cross(&Vector2::x(), &(Vector2::x() * 3.0)), 0.0);
    }

    #[test]
    fn test_unit_or_zero() {
        assert_relative_eq!(unit_or_zero(&Vector2::new(3.0, 4.0)).norm(), 1.0);
        assert_eq!(unit_or_zero(&Vector2::zeros()), Vector2::zeros());
    }

    #[test]
    fn test_distance_to_segment_interior_and_ends() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(10.0, 0.0);
        assert_relative_eq!(distance_to_segment(Point2::new(5.0, 3.0), a, b), 3.0);
        assert_relative_eq!(distance_to_segment(Point2::new(-3.0, 4.0), a, b), 5.0);
        assert_relative_eq!(distance_to_segment(Point2::new(13.0, -4.0), a, b), 5.0);
        assert_relative_eq!(distance_to_segment(Point2::new(7.0, 0.0), a, b), 0.0);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point2::new(1.0, 1.0);
        assert_relative_eq!(distance_to_segment(Point2::new(4.0, 5.0), a, a), 5.0);
    }

    #[test]
    fn test_solve_2x2() {
        let m = Matrix2::new(1.0, 1.0, 1.0, -1.0);
        let x = solve_2x2(&m, &Vector2::new(3.0, 1.0), SINGULAR_EPSILON).unwrap();
        assert_relative_eq!(x, Vector2::new(2.0, 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_is_finite_point() {
        assert!(is_finite_point(&Point2::new(1.0, 2.0)));
        assert!(!is_finite_point(&Point2::new(f64::NAN, 2.0)));
        assert!(!is_finite_point(&Point2::new(1.0, f64::INFINITY)));
    }
}
