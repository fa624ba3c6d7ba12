//! Selection between iterative IK methods.

use nalgebra::{DVector, Point2};

use crate::error::IkError;
use crate::jacobian::{jacobian_transpose_step, pseudo_inverse_step};

/// Iterative IK method used to compute a joint-space step.
///
/// # Example
///
/// ```
/// use limb_ik::IkMethod;
/// use nalgebra::Point2;
///
/// let method = IkMethod::pseudo_inverse(0.1);
/// let step = method
///     .step(Point2::origin(), &[1.0, 1.0], &[0.3, 0.6], Point2::new(0.5, 1.5))
///     .unwrap();
/// assert_eq!(step.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IkMethod {
    /// `Jᵀ · e`. Cheap and stable, slows down near the goal.
    #[default]
    JacobianTranspose,

    /// `Jᵀ · (J·Jᵀ + λ²I)⁻¹ · e`. Converges in fewer steps away from singularities.
    PseudoInverse {
        /// Damping factor `λ`; zero gives the undamped pseudo-inverse.
        damping: f64,
    },
}

impl IkMethod {
    /// Creates a pseudo-inverse method with the given damping.
    #[must_use]
    pub const fn pseudo_inverse(damping: f64) -> Self {
        Self::PseudoInverse { damping }
    }

    /// Short human-readable name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::JacobianTranspose => "Jacobian transpose",
            Self::PseudoInverse { .. } => "pseudo-inverse",
        }
    }

    /// Computes the joint-space step that moves the free end toward `goal`.
    ///
    /// # Errors
    ///
    /// Returns an error if the shapes of `lengths` and `angles` differ or are empty.
    pub fn step(
        &self,
        pivot: Point2<f64>,
        lengths: &[f64],
        angles: &[f64],
        goal: Point2<f64>,
    ) -> Result<DVector<f64>, IkError> {
        match *self {
            Self::JacobianTranspose => jacobian_transpose_step(pivot, lengths, angles, goal),
            Self::PseudoInverse { damping } => {
                pseudo_inverse_step(pivot, lengths, angles, goal, damping)
            }
        }
    }
}
