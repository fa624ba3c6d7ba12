//! Error types for planar space construction.

use nalgebra::Point2;

/// Errors that can occur while building obstacles or configuration spaces.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SpaceError {
    /// A circle obstacle must have a strictly positive, finite radius.
    #[error("circle radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// A segment obstacle must have two distinct endpoints.
    #[error("segment endpoints must be distinct, got {a} and {b}")]
    DegenerateSegment {
        /// First endpoint.
        a: Point2<f64>,
        /// Second endpoint.
        b: Point2<f64>,
    },

    /// A coordinate or parameter was NaN or infinite.
    #[error("non-finite value for {0}")]
    NonFinite(&'static str),
}

impl SpaceError {
    /// Returns `true` if this error was caused by a non-finite input.
    #[must_use]
    pub const fn is_non_finite(&self) -> bool {
        matches!(self, Self::NonFinite(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_display() {
        let error = SpaceError::NonPositiveRadius(-1.0);
        assert!(error.to_string().contains("radius"));
        assert!(error.to_string().contains("-1"));
    }

    #[test]
    fn test_degenerate_segment_display() {
        let p = Point2::new(1.0, 2.0);
        let error = SpaceError::DegenerateSegment { a: p, b: p };
        assert!(error.to_string().contains("distinct"));
    }

    #[test]
    fn test_is_non_finite() {
        assert!(SpaceError::NonFinite("center").is_non_finite());
        assert!(!SpaceError::NonPositiveRadius(0.0).is_non_finite());
    }
}
