//! Error types for roadmap operations.
//!
//! This module defines the [`RoadmapError`] enum which represents all possible
//! errors that can occur while configuring, growing or editing a roadmap.
//!
//! An unreachable goal is deliberately *not* an error: searches return a
//! one-element route (see [`crate::Route::is_unreachable`]).

use crate::milestone::MilestoneId;

/// Errors that can occur during roadmap operations.
///
/// # Example
///
/// ```
/// use roadmap_types::RoadmapError;
///
/// let error = RoadmapError::InvalidEdgeBand { min: 10.0, max: 5.0 };
/// assert!(error.to_string().contains("edge band"));
/// ```
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum RoadmapError {
    /// The edge length band is empty, negative or not finite.
    #[error("invalid edge band [{min}, {max}]: need 0 <= min <= max")]
    InvalidEdgeBand {
        /// Lower bound on edge length.
        min: f64,
        /// Upper bound on edge length.
        max: f64,
    },

    /// The sampling rectangle has a non-finite corner or extent.
    #[error("sampling area corners and extents must be finite")]
    InvalidSamplingArea,

    /// The obstacle clearance margin is negative or not finite.
    #[error("margin must be finite and non-negative, got {0}")]
    InvalidMargin(f64),

    /// The weighted A* inflation factor is below one or not finite.
    #[error("weighted A* epsilon must be finite and >= 1, got {0}")]
    InvalidEpsilon(f64),

    /// Rejection sampling could not find a free point.
    ///
    /// The sampling area is likely covered by obstacles once the margin is applied.
    #[error("no free sample found after {attempts} attempts")]
    SamplingExhausted {
        /// Number of rejected samples.
        attempts: usize,
    },

    /// A milestone id does not refer to a live milestone.
    #[error("unknown milestone {0}")]
    UnknownMilestone(MilestoneId),

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RoadmapError {
    /// Creates an invalid configuration error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_types::RoadmapError;
    ///
    /// let error = RoadmapError::invalid_config("max_attempts_per_sample must be positive");
    /// assert!(error.to_string().contains("max_attempts"));
    /// ```
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if sampling ran out of attempts.
    #[must_use]
    pub const fn is_sampling_exhausted(&self) -> bool {
        matches!(self, Self::SamplingExhausted { .. })
    }

    /// Returns `true` if this error refers to a missing milestone.
    #[must_use]
    pub const fn is_unknown_milestone(&self) -> bool {
        matches!(self, Self::UnknownMilestone(_))
    }
}
