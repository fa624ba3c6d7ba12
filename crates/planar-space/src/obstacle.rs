//! Obstacle shapes.
//!
//! The obstacle set is closed: an [`Obstacle`] is either a [`Circle`] or a
//! [`Segment`], and every query dispatches by pattern matching. Each shape
//! answers two questions:
//!
//! - does a straight segment `p1`-`p2` touch the shape, and
//! - is a point within `margin` of the shape.
//!
//! # Example
//!
//! ```
//! use planar_space::Obstacle;
//! use nalgebra::Point2;
//!
//! let rock = Obstacle::circle(Point2::new(0.0, 0.0), 2.0).unwrap();
//! assert!(rock.intersects_segment(Point2::new(-5.0, 0.0), Point2::new(5.0, 0.0)));
//! assert!(!rock.intersects_segment(Point2::new(-5.0, 3.0), Point2::new(5.0, 3.0)));
//!
//! let wall = Obstacle::segment(Point2::new(0.0, -1.0), Point2::new(0.0, 1.0)).unwrap();
//! assert!(wall.intersects_point(Point2::new(0.5, 0.0), 0.5));
//! ```

use nalgebra::{Matrix2, Point2, Vector2};

use crate::error::SpaceError;
use crate::geometry::{SINGULAR_EPSILON, cross, distance_to_segment, is_finite_point, solve_2x2};

/// Tolerance used for endpoint and collinearity comparisons.
const TOUCH_EPSILON: f64 = 1e-9;

/// A circular obstacle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Circle {
    center: Point2<f64>,
    radius: f64,
}

impl Circle {
    /// Creates a circle, rejecting non-positive or non-finite radii.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::NonPositiveRadius`] if `radius <= 0` and
    /// [`SpaceError::NonFinite`] if the center or radius is not finite.
    pub fn new(center: Point2<f64>, radius: f64) -> Result<Self, SpaceError> {
        if !is_finite_point(&center) {
            return Err(SpaceError::NonFinite("circle center"));
        }
        if !radius.is_finite() {
            return Err(SpaceError::NonFinite("circle radius"));
        }
        if radius <= 0.0 {
            return Err(SpaceError::NonPositiveRadius(radius));
        }
        Ok(Self { center, radius })
    }

    /// Returns the center.
    #[must_use]
    pub const fn center(&self) -> Point2<f64> {
        self.center
    }

    /// Returns the radius.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns `true` if the closed segment `p1`-`p2` touches the disc.
    ///
    /// Solves `|p1 + t (p2 - p1) - c|² = r²` for `t`. The segment touches the
    /// circle when a root lies in `[0, 1]`; when the roots straddle the whole
    /// interval the segment lies inside the disc, which also counts.
    #[must_use]
    pub fn intersects_segment(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        let d = p2 - p1;
        let f = p1 - self.center;
        let a = d.dot(&d);
        if a < TOUCH_EPSILON * TOUCH_EPSILON {
            return self.intersects_point(p1, 0.0);
        }
        let b = 2.0 * d.dot(&f);
        let c = self.radius.mul_add(-self.radius, f.dot(&f));
        let discriminant = b.mul_add(b, -4.0 * a * c);
        if discriminant < 0.0 {
            return false;
        }
        let sqrt_disc = discriminant.sqrt();
        let t_far = (-b + sqrt_disc) / (2.0 * a);
        let t_near = (-b - sqrt_disc) / (2.0 * a);
        let in_unit = |t: f64| (0.0..=1.0).contains(&t);
        in_unit(t_far) || in_unit(t_near) || (t_near < 0.0 && t_far > 1.0)
    }

    /// Returns `true` if `point` lies within `radius + margin` of the center.
    #[must_use]
    pub fn intersects_point(&self, point: Point2<f64>, margin: f64) -> bool {
        (point - self.center).norm() <= self.radius + margin
    }
}

/// A straight wall between two distinct endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    a: Point2<f64>,
    b: Point2<f64>,
}

impl Segment {
    /// Creates a segment obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`SpaceError::DegenerateSegment`] if `a == b` and
    /// [`SpaceError::NonFinite`] if either endpoint is not finite.
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Result<Self, SpaceError> {
        if !is_finite_point(&a) || !is_finite_point(&b) {
            return Err(SpaceError::NonFinite("segment endpoint"));
        }
        if a == b {
            return Err(SpaceError::DegenerateSegment { a, b });
        }
        Ok(Self { a, b })
    }

    /// Returns the first endpoint.
    #[must_use]
    pub const fn a(&self) -> Point2<f64> {
        self.a
    }

    /// Returns the second endpoint.
    #[must_use]
    pub const fn b(&self) -> Point2<f64> {
        self.b
    }

    /// Returns the segment length.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.b - self.a).norm()
    }

    /// Returns `true` if the closed segment `p1`-`p2` crosses or touches this wall.
    ///
    /// Both supporting lines are written as `n · x = k` and solved as a 2x2
    /// system. A near-zero determinant means the lines are parallel; they then
    /// intersect only when collinear and overlapping in projection. Otherwise
    /// the crossing point is projected onto each segment's unit direction and
    /// must fall within `[0, length]` for both.
    #[must_use]
    pub fn intersects_segment(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        let (e1, e2) = (self.a, self.b);
        let query = p2 - p1;
        let wall = e2 - e1;

        let m = Matrix2::new(query.y, -query.x, wall.y, -wall.x);
        let rhs = Vector2::new(cross(&p1.coords, &p2.coords), cross(&e1.coords, &e2.coords));

        let scale = (query.norm() * wall.norm()).max(1.0);
        let Some(x) = solve_2x2(&m, &rhs, SINGULAR_EPSILON * scale) else {
            return self.overlaps_collinear(p1, p2);
        };
        let x = Point2::from(x);

        within_extent(x, p1, &query) && within_extent(x, e1, &wall)
    }

    /// Parallel case: collinear segments intersect iff their projections overlap.
    fn overlaps_collinear(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        let wall = self.b - self.a;
        let length = wall.norm();
        let unit = wall / length;
        // Both query endpoints must lie on the wall's supporting line
        let off_line = cross(&unit, &(p1 - self.a))
            .abs()
            .max(cross(&unit, &(p2 - self.a)).abs());
        if off_line > TOUCH_EPSILON.max(SINGULAR_EPSILON * length) {
            return false;
        }
        let t1 = (p1 - self.a).dot(&unit);
        let t2 = (p2 - self.a).dot(&unit);
        let lo = t1.min(t2).max(0.0);
        let hi = t1.max(t2).min(length);
        lo <= hi + TOUCH_EPSILON
    }

    /// Returns `true` if `point` lies within `margin` of the closed segment.
    #[must_use]
    pub fn intersects_point(&self, point: Point2<f64>, margin: f64) -> bool {
        distance_to_segment(point, self.a, self.b) <= margin
    }
}

/// Checks that `x` projects onto `[0, |dir|]` along the unit direction of `dir` from `origin`.
fn within_extent(x: Point2<f64>, origin: Point2<f64>, dir: &Vector2<f64>) -> bool {
    let length = dir.norm();
    if length == 0.0 {
        return (x - origin).norm() <= TOUCH_EPSILON;
    }
    let t = (x - origin).dot(&(dir / length));
    (-TOUCH_EPSILON..=length + TOUCH_EPSILON).contains(&t)
}

/// An obstacle in the planar field.
///
/// # Example
///
/// ```
/// use planar_space::Obstacle;
/// use nalgebra::Point2;
///
/// let obstacles = [
///     Obstacle::circle(Point2::new(0.0, 0.0), 1.0).unwrap(),
///     Obstacle::segment(Point2::new(5.0, -5.0), Point2::new(5.0, 5.0)).unwrap(),
/// ];
/// let hits = obstacles
///     .iter()
///     .filter(|o| o.intersects_segment(Point2::new(-2.0, 0.0), Point2::new(6.0, 0.0)))
///     .count();
/// assert_eq!(hits, 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Obstacle {
    /// A disc.
    Circle(Circle),
    /// A wall segment.
    Segment(Segment),
}

impl Obstacle {
    /// Creates a circle obstacle.
    ///
    /// # Errors
    ///
    /// See [`Circle::new`].
    pub fn circle(center: Point2<f64>, radius: f64) -> Result<Self, SpaceError> {
        Circle::new(center, radius).map(Self::Circle)
    }

    /// Creates a segment obstacle.
    ///
    /// # Errors
    ///
    /// See [`Segment::new`].
    pub fn segment(a: Point2<f64>, b: Point2<f64>) -> Result<Self, SpaceError> {
        Segment::new(a, b).map(Self::Segment)
    }

    /// Returns `true` if the closed segment `p1`-`p2` touches this obstacle.
    #[must_use]
    pub fn intersects_segment(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        match self {
            Self::Circle(circle) => circle.intersects_segment(p1, p2),
            Self::Segment(segment) => segment.intersects_segment(p1, p2),
        }
    }

    /// Returns `true` if `point` is within `margin` of this obstacle.
    #[must_use]
    pub fn intersects_point(&self, point: Point2<f64>, margin: f64) -> bool {
        match self {
            Self::Circle(circle) => circle.intersects_point(point, margin),
            Self::Segment(segment) => segment.intersects_point(point, margin),
        }
    }
}

impl From<Circle> for Obstacle {
    fn from(circle: Circle) -> Self {
        Self::Circle(circle)
    }
}

impl From<Segment> for Obstacle {
    fn from(segment: Segment) -> Self {
        Self::Segment(segment)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::TAU;

    fn circle(x: f64, y: f64, r: f64) -> Circle {
        Circle::new(Point2::new(x, y), r).unwrap()
    }

    fn wall(ax: f64, ay: f64, bx: f64, by: f64) -> Segment {
        Segment::new(Point2::new(ax, ay), Point2::new(bx, by)).unwrap()
    }

    // Circle construction

    #[test]
    fn test_circle_rejects_bad_radius() {
        assert!(matches!(
            Circle::new(Point2::origin(), 0.0),
            Err(SpaceError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            Circle::new(Point2::origin(), -2.0),
            Err(SpaceError::NonPositiveRadius(_))
        ));
        assert!(matches!(
            Circle::new(Point2::origin(), f64::NAN),
            Err(SpaceError::NonFinite(_))
        ));
    }

    // Circle vs segment

    #[test]
    fn test_circle_segment_through_center() {
        let c = circle(3.0, -2.0, 1.5);
        assert!(c.intersects_segment(Point2::new(0.0, -2.0), Point2::new(6.0, -2.0)));
        assert!(c.intersects_segment(Point2::new(3.0, 5.0), Point2::new(3.0, -9.0)));
    }

    #[test]
    fn test_circle_segment_misses() {
        let c = circle(0.0, 0.0, 1.0);
        assert!(!c.intersects_segment(Point2::new(-3.0, 1.5), Point2::new(3.0, 1.5)));
    }

    #[test]
    fn test_circle_segment_stops_short() {
        let c = circle(0.0, 0.0, 1.0);
        // On the line through the center but ends before reaching the circle
        assert!(!c.intersects_segment(Point2::new(-5.0, 0.0), Point2::new(-2.0, 0.0)));
    }

    #[test]
    fn test_circle_segment_inside_disc() {
        let c = circle(0.0, 0.0, 10.0);
        assert!(c.intersects_segment(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)));
    }

    #[test]
    fn test_circle_segment_ending_inside() {
        let c = circle(0.0, 0.0, 1.0);
        assert!(c.intersects_segment(Point2::new(-4.0, 0.0), Point2::new(0.0, 0.0)));
    }

    #[test]
    fn test_circle_zero_length_segment() {
        let c = circle(0.0, 0.0, 1.0);
        let p = Point2::new(0.5, 0.0);
        assert!(c.intersects_segment(p, p));
        let q = Point2::new(2.0, 0.0);
        assert!(!c.intersects_segment(q, q));
    }

    #[test]
    fn test_circle_random_chords() {
        // Random segments: far ones never hit, ones through the center always do
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let center = Point2::new(rng.gen_range(-50.0..50.0), rng.gen_range(-50.0..50.0));
            let radius = rng.gen_range(0.1..10.0);
            let c = Circle::new(center, radius).unwrap();

            let theta: f64 = rng.gen_range(0.0..TAU);
            let dir = Vector2::new(theta.cos(), theta.sin());
            let normal = Vector2::new(-dir.y, dir.x);

            let offset = radius * rng.gen_range(1.01..3.0);
            let base = center + normal * offset;
            let p1 = base - dir * rng.gen_range(0.0..20.0);
            let p2 = base + dir * rng.gen_range(0.0..20.0);
            assert!(!c.intersects_segment(p1, p2));

            let q1 = center - dir * rng.gen_range(0.01..20.0);
            let q2 = center + dir * rng.gen_range(0.01..20.0);
            assert!(c.intersects_segment(q1, q2));
        }
    }

    #[test]
    fn test_circle_point_margin() {
        let c = circle(0.0, 0.0, 2.0);
        assert!(c.intersects_point(Point2::new(2.5, 0.0), 0.5));
        assert!(!c.intersects_point(Point2::new(2.6, 0.0), 0.5));
        assert!(c.intersects_point(Point2::new(1.0, 1.0), 0.0));
    }

    // Segment construction

    #[test]
    fn test_segment_rejects_degenerate() {
        let p = Point2::new(1.0, 1.0);
        assert!(matches!(
            Segment::new(p, p),
            Err(SpaceError::DegenerateSegment { .. })
        ));
        assert!(matches!(
            Segment::new(p, Point2::new(f64::INFINITY, 0.0)),
            Err(SpaceError::NonFinite(_))
        ));
    }

    // Segment vs segment

    #[test]
    fn test_segment_crossing() {
        let w = wall(0.0, -1.0, 0.0, 1.0);
        assert!(w.intersects_segment(Point2::new(-1.0, 0.0), Point2::new(1.0, 0.0)));
        assert!(w.intersects_segment(Point2::new(-1.0, -1.0), Point2::new(1.0, 1.0)));
    }

    #[test]
    fn test_segment_crossing_outside_extent() {
        let w = wall(0.0, -1.0, 0.0, 1.0);
        // Lines cross at (0, 3), beyond the wall
        assert!(!w.intersects_segment(Point2::new(-1.0, 3.0), Point2::new(1.0, 3.0)));
        // Lines cross at (0, 0), beyond the query segment
        assert!(!w.intersects_segment(Point2::new(1.0, 0.0), Point2::new(3.0, 0.0)));
    }

    #[test]
    fn test_segment_touching_endpoint() {
        let w = wall(0.0, 0.0, 0.0, 2.0);
        assert!(w.intersects_segment(Point2::new(-1.0, 2.0), Point2::new(1.0, 2.0)));
    }

    #[test]
    fn test_segment_parallel_disjoint() {
        let w = wall(0.0, 0.0, 4.0, 0.0);
        assert!(!w.intersects_segment(Point2::new(0.0, 1.0), Point2::new(4.0, 1.0)));
    }

    #[test]
    fn test_segment_collinear_overlap() {
        let w = wall(0.0, 0.0, 4.0, 0.0);
        assert!(w.intersects_segment(Point2::new(3.0, 0.0), Point2::new(6.0, 0.0)));
        assert!(w.intersects_segment(Point2::new(6.0, 0.0), Point2::new(-1.0, 0.0)));
        assert!(w.intersects_segment(Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)));
    }

    #[test]
    fn test_segment_collinear_disjoint() {
        let w = wall(0.0, 0.0, 4.0, 0.0);
        assert!(!w.intersects_segment(Point2::new(5.0, 0.0), Point2::new(8.0, 0.0)));
        assert!(!w.intersects_segment(Point2::new(-3.0, 0.0), Point2::new(-1.0, 0.0)));
    }

    #[test]
    fn test_segment_point_margin() {
        let w = wall(0.0, 0.0, 10.0, 0.0);
        assert!(w.intersects_point(Point2::new(5.0, 1.0), 1.0));
        assert!(!w.intersects_point(Point2::new(5.0, 1.1), 1.0));
        // Clipped to the endpoint
        assert!(!w.intersects_point(Point2::new(11.0, 0.5), 1.0));
        assert!(w.intersects_point(Point2::new(10.5, 0.5), 1.0));
    }

    // Enum dispatch

    #[test]
    fn test_obstacle_dispatch() {
        let c: Obstacle = circle(0.0, 0.0, 1.0).into();
        let s: Obstacle = wall(5.0, -1.0, 5.0, 1.0).into();
        let p1 = Point2::new(-2.0, 0.0);
        let p2 = Point2::new(2.0, 0.0);
        assert!(c.intersects_segment(p1, p2));
        assert!(!s.intersects_segment(p1, p2));
        assert!(s.intersects_point(Point2::new(5.5, 0.0), 0.5));
        assert!(!c.intersects_point(Point2::new(5.5, 0.0), 0.5));
    }
}
