//! Error types for inverse kinematics.

/// Errors that can occur while evaluating or solving a planar chain.
///
/// # Example
///
/// ```
/// use limb_ik::IkError;
///
/// let error = IkError::OutOfReach { distance: 25.0, min: 0.0, max: 20.0 };
/// assert!(error.is_out_of_reach());
/// assert!(error.to_string().contains("25"));
/// ```
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum IkError {
    /// The goal lies outside the annulus a two-link chain can reach.
    #[error("goal at distance {distance} is outside reachable range [{min}, {max}]")]
    OutOfReach {
        /// Distance from pivot to goal.
        distance: f64,
        /// Innermost reachable distance, `|l1 - l2|`.
        min: f64,
        /// Outermost reachable distance, `l1 + l2`.
        max: f64,
    },

    /// Link lengths and joint angles disagree in count.
    #[error("chain has {lengths} link lengths but {angles} joint angles")]
    LengthMismatch {
        /// Number of link lengths.
        lengths: usize,
        /// Number of joint angles.
        angles: usize,
    },

    /// The chain has no links.
    #[error("chain has no links")]
    EmptyChain,

    /// A link length is zero, negative or not finite.
    #[error("link {index} has invalid length {length}")]
    NonPositiveLength {
        /// Index of the offending link.
        index: usize,
        /// The offending length.
        length: f64,
    },
}

impl IkError {
    /// Returns `true` if the goal was out of reach.
    #[must_use]
    pub const fn is_out_of_reach(&self) -> bool {
        matches!(self, Self::OutOfReach { .. })
    }

    /// Returns `true` if the chain description itself is malformed.
    #[must_use]
    pub const fn is_shape_error(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::EmptyChain | Self::NonPositiveLength { .. }
        )
    }
}
