//! Error types for limb controllers.

use limb_ik::IkError;
use roadmap_types::RoadmapError;

/// Errors that can occur while spawning, driving or replanning a limb.
///
/// None of these are fatal to a simulation loop. A rejected spawn leaves
/// the limb exactly as it was.
///
/// # Example
///
/// ```
/// use limb_control::LimbError;
///
/// let error = LimbError::ShapeMismatch { expected: 3, lengths: 2, angles: 3 };
/// assert!(error.is_shape_mismatch());
/// assert!(error.to_string().contains("expected 3"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LimbError {
    /// Spawn parameters do not match the chain's link count.
    #[error("invalid spawn parameters: expected {expected} links, got {lengths} lengths and {angles} angles")]
    ShapeMismatch {
        /// Link count fixed at construction.
        expected: usize,
        /// Number of lengths supplied.
        lengths: usize,
        /// Number of angles supplied.
        angles: usize,
    },

    /// Kinematics failure.
    #[error("kinematics error: {0}")]
    Ik(#[from] IkError),

    /// Roadmap search or editing failure.
    #[error("planning error: {0}")]
    Planning(#[from] RoadmapError),

    /// The controller has no route to follow.
    #[error("no active route")]
    NoActiveRoute,

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LimbError {
    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if spawn parameters had the wrong shape.
    #[must_use]
    pub const fn is_shape_mismatch(&self) -> bool {
        matches!(self, Self::ShapeMismatch { .. })
    }

    /// Returns `true` if the error came from the IK layer.
    #[must_use]
    pub const fn is_ik(&self) -> bool {
        matches!(self, Self::Ik(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ik_error() {
        let error: LimbError = IkError::EmptyChain.into();
        assert!(error.is_ik());
        assert!(error.to_string().contains("no links"));
    }

    #[test]
    fn test_from_roadmap_error() {
        let error: LimbError = RoadmapError::InvalidEpsilon(0.5).into();
        assert!(matches!(error, LimbError::Planning(_)));
        assert!(error.to_string().contains("0.5"));
    }

    #[test]
    fn test_invalid_config() {
        let error = LimbError::invalid_config("reach_slack must be positive");
        assert!(error.to_string().contains("reach_slack"));
        assert!(!error.is_shape_mismatch());
    }
}
