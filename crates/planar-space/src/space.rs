//! Configuration space: a borrowed view over a scenario's obstacles.

use nalgebra::Point2;

use crate::obstacle::Obstacle;

/// Aggregates a borrowed set of obstacles and answers collision queries.
///
/// Queries scan every obstacle; nothing is cached. The space never mutates
/// the obstacles and cannot outlive them.
///
/// # Example
///
/// ```
/// use planar_space::{ConfigurationSpace, Obstacle};
/// use nalgebra::Point2;
///
/// let obstacles = vec![Obstacle::circle(Point2::new(0.0, 0.0), 5.0).unwrap()];
/// let space = ConfigurationSpace::new(&obstacles);
///
/// assert!(space.intersects_segment(Point2::new(-10.0, 0.0), Point2::new(10.0, 0.0)));
/// assert!(space.intersects_point(Point2::new(6.0, 0.0), 1.5));
/// assert!(!space.intersects_point(Point2::new(8.0, 0.0), 1.5));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfigurationSpace<'a> {
    obstacles: &'a [Obstacle],
}

impl<'a> ConfigurationSpace<'a> {
    /// Creates a configuration space over `obstacles`.
    #[must_use]
    pub const fn new(obstacles: &'a [Obstacle]) -> Self {
        Self { obstacles }
    }

    /// An obstacle-free space.
    #[must_use]
    pub const fn empty() -> Self {
        Self { obstacles: &[] }
    }

    /// Returns the borrowed obstacles.
    #[must_use]
    pub const fn obstacles(&self) -> &'a [Obstacle] {
        self.obstacles
    }

    /// Returns the number of obstacles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.obstacles.len()
    }

    /// Returns `true` if the space has no obstacles.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    /// Returns `true` if the segment `p1`-`p2` touches any obstacle.
    #[must_use]
    pub fn intersects_segment(&self, p1: Point2<f64>, p2: Point2<f64>) -> bool {
        self.obstacles.iter().any(|o| o.intersects_segment(p1, p2))
    }

    /// Returns `true` if `point` is within `margin` of any obstacle.
    #[must_use]
    pub fn intersects_point(&self, point: Point2<f64>, margin: f64) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.intersects_point(point, margin))
    }

    /// Returns `true` if any consecutive pair in `points` forms a colliding segment.
    ///
    /// Fewer than two points never collide.
    #[must_use]
    pub fn intersects_polyline(&self, points: &[Point2<f64>]) -> bool {
        points
            .windows(2)
            .any(|pair| self.intersects_segment(pair[0], pair[1]))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn field() -> Vec<Obstacle> {
        vec![
            Obstacle::circle(Point2::new(0.0, 0.0), 2.0).unwrap(),
            Obstacle::segment(Point2::new(10.0, -5.0), Point2::new(10.0, 5.0)).unwrap(),
        ]
    }

    #[test]
    fn test_empty_space_never_collides() {
        let space = ConfigurationSpace::empty();
        assert!(space.is_empty());
        assert!(!space.intersects_segment(Point2::new(-1e6, 0.0), Point2::new(1e6, 0.0)));
        assert!(!space.intersects_point(Point2::origin(), 1e6));
    }

    #[test]
    fn test_segment_query_is_any() {
        let obstacles = field();
        let space = ConfigurationSpace::new(&obstacles);
        assert_eq!(space.len(), 2);
        // Only the wall
        assert!(space.intersects_segment(Point2::new(8.0, 0.0), Point2::new(12.0, 0.0)));
        // Only the disc
        assert!(space.intersects_segment(Point2::new(-3.0, 0.0), Point2::new(3.0, 0.0)));
        // Neither
        assert!(!space.intersects_segment(Point2::new(4.0, 0.0), Point2::new(8.0, 0.0)));
    }

    #[test]
    fn test_point_query_uses_margin() {
        let obstacles = field();
        let space = ConfigurationSpace::new(&obstacles);
        assert!(space.intersects_point(Point2::new(9.0, 0.0), 1.0));
        assert!(!space.intersects_point(Point2::new(6.0, 0.0), 1.0));
        assert!(space.intersects_point(Point2::new(6.0, 0.0), 4.0));
    }

    #[test]
    fn test_polyline() {
        let obstacles = field();
        let space = ConfigurationSpace::new(&obstacles);
        let clear = [
            Point2::new(-5.0, 5.0),
            Point2::new(5.0, 5.0),
            Point2::new(5.0, -5.0),
        ];
        assert!(!space.intersects_polyline(&clear));

        let blocked = [Point2::new(5.0, 5.0), Point2::new(5.0, 0.0), Point2::new(12.0, 0.0)];
        assert!(space.intersects_polyline(&blocked));

        assert!(!space.intersects_polyline(&[Point2::origin()]));
    }
}
