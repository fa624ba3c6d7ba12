//! Pivot-switching serial limb.
//!
//! A [`LimbChain`] is an `N`-link planar chain anchored at a pivot. Each
//! [`update`](LimbChain::update) nudges its joint angles so the free end
//! approaches the current goal. Once the goal is reached the owner calls
//! [`switch_pivot`](LimbChain::switch_pivot): the free end becomes the new
//! anchor and the chain is re-expressed from there, so the limb can walk
//! end over end like an inchworm.

use limb_ik::IkError;
use limb_ik::chain::{self, check_lengths};
use nalgebra::{DVector, Point2};
use planar_space::ConfigurationSpace;
use planar_space::geometry::wrap_angle;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

use crate::config::LimbConfig;
use crate::error::LimbError;

/// An `N`-link planar chain that reaches for goals and can swap its anchored end.
///
/// The link count is fixed at construction; `lengths` and `angles` always
/// hold exactly that many entries.
///
/// # Example
///
/// ```
/// use limb_control::{LimbChain, LimbConfig};
/// use nalgebra::Point2;
///
/// let mut limb = LimbChain::spawned(
///     Point2::origin(),
///     &[5.0, 5.0, 5.0],
///     &[0.3, 0.3, 0.3],
///     LimbConfig::default().with_seed(1),
/// )
/// .unwrap();
///
/// limb.set_goal(Point2::new(6.0, 9.0));
/// let mut reached = false;
/// for _ in 0..20_000 {
///     if limb.update(0.001, 0.0) {
///         reached = true;
///         break;
///     }
/// }
/// assert!(reached);
///
/// let tip = limb.free_end();
/// limb.switch_pivot();
/// assert!((limb.pivot() - tip).norm() < 1e-9);
/// assert!(!limb.is_forward_oriented());
/// ```
#[derive(Debug, Clone)]
pub struct LimbChain {
    pivot: Point2<f64>,
    lengths: Vec<f64>,
    angles: DVector<f64>,
    goal: Point2<f64>,
    forward: bool,
    config: LimbConfig,
    rng: StdRng,
}

impl LimbChain {
    /// Creates a straight chain of `links` unit-length links at the origin.
    ///
    /// Call [`spawn`](Self::spawn) to give it real lengths and a pose.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::Ik`] for zero links and [`LimbError::InvalidConfig`]
    /// for an invalid configuration.
    pub fn new(links: usize, config: LimbConfig) -> Result<Self, LimbError> {
        config.validate()?;
        if links == 0 {
            return Err(IkError::EmptyChain.into());
        }
        let rng = config
            .seed()
            .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        let mut limb = Self {
            pivot: Point2::origin(),
            lengths: vec![1.0; links],
            angles: DVector::zeros(links),
            goal: Point2::origin(),
            forward: true,
            config,
            rng,
        };
        limb.goal = limb.free_end();
        Ok(limb)
    }

    /// Creates a chain and spawns it in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid, the chain is empty
    /// or a link length is not positive.
    pub fn spawned(
        pivot: Point2<f64>,
        lengths: &[f64],
        angles: &[f64],
        config: LimbConfig,
    ) -> Result<Self, LimbError> {
        let mut limb = Self::new(lengths.len(), config)?;
        limb.spawn(pivot, lengths, angles)?;
        Ok(limb)
    }

    /// Places the chain at `pivot` with the given link lengths and joint angles.
    ///
    /// Angles are wrapped to `(-π, π]`, the goal is set to the resulting free
    /// end and the chain becomes forward oriented. On error the chain is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::ShapeMismatch`] if either slice does not have one
    /// entry per link and [`LimbError::Ik`] for a non-positive length.
    pub fn spawn(
        &mut self,
        pivot: Point2<f64>,
        lengths: &[f64],
        angles: &[f64],
    ) -> Result<(), LimbError> {
        let expected = self.links();
        if lengths.len() != expected || angles.len() != expected {
            warn!(
                expected,
                lengths = lengths.len(),
                angles = angles.len(),
                "Invalid spawn parameters"
            );
            return Err(LimbError::ShapeMismatch {
                expected,
                lengths: lengths.len(),
                angles: angles.len(),
            });
        }
        if let Err(error) = check_lengths(lengths) {
            warn!(%error, "Invalid spawn parameters");
            return Err(error.into());
        }

        self.pivot = pivot;
        self.lengths.copy_from_slice(lengths);
        self.angles = DVector::from_iterator(expected, angles.iter().map(|&q| wrap_angle(q)));
        self.forward = true;
        self.goal = self.free_end();
        debug!(links = expected, pivot = ?pivot, "Spawned limb");
        Ok(())
    }

    /// Sets the point the free end reaches for.
    pub const fn set_goal(&mut self, goal: Point2<f64>) {
        self.goal = goal;
    }

    /// Advances the chain by one timestep toward its goal.
    ///
    /// Returns `true` without moving if the free end is already within the
    /// reach slack of the goal. A non-positive `dt` changes nothing.
    /// Otherwise the IK step scaled by `dt` is applied, with a random jerk
    /// when it is below the jerk threshold and a rescale up to `min_speed`
    /// when it is slower than that.
    pub fn update(&mut self, dt: f64, min_speed: f64) -> bool {
        if self.is_at_goal() {
            return true;
        }
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }

        let mut delta = self.ik_delta(dt);
        if delta.norm() < self.config.jerk_threshold() {
            self.jerk(&mut delta);
        }
        let norm = delta.norm();
        if norm > 0.0 && norm < min_speed {
            delta *= min_speed / norm;
        }
        self.angles += delta;
        false
    }

    /// Returns the IK step toward the goal scaled by `dt`, without jerk or speed floor.
    #[must_use]
    pub fn ik_delta(&self, dt: f64) -> DVector<f64> {
        self.config
            .method()
            .step(self.pivot, &self.lengths, self.angles.as_slice(), self.goal)
            .map_or_else(|_| DVector::zeros(self.links()), |step| step * dt)
    }

    fn jerk(&mut self, delta: &mut DVector<f64>) {
        #[allow(clippy::cast_precision_loss)]
        let upper = 1.0 / (self.links() + 1) as f64;
        for q in delta.iter_mut() {
            *q += self.rng.gen_range(0.0..upper);
        }
    }

    /// Anchors the chain at its current free end.
    ///
    /// Link order is reversed and joint angles are recomputed relative to the
    /// new traversal direction, wrapped to `(-π, π]`. The free end moves to
    /// the old pivot; the world-space shape of the chain is unchanged.
    pub fn switch_pivot(&mut self) {
        let ends = self.link_ends();
        let links = self.links();
        let Some(&free) = ends.last() else {
            return;
        };

        let mut previous = 0.0;
        for i in (1..ends.len()).rev() {
            let link = ends[i - 1] - ends[i];
            let world = link.y.atan2(link.x);
            self.angles[links - i] = wrap_angle(world - previous);
            previous = world;
        }
        self.pivot = free;
        self.lengths.reverse();
        self.forward = !self.forward;
        debug!(pivot = ?free, forward = self.forward, "Switched pivot");
    }

    /// Returns `true` if any inner joint lies within `joint_margin` of an
    /// obstacle or any link crosses one.
    ///
    /// The pivot and the free end are excluded from the clearance test; they
    /// rest on roadmap milestones.
    #[must_use]
    pub fn intersects(&self, space: ConfigurationSpace<'_>, joint_margin: f64) -> bool {
        let ends = self.link_ends();
        let inner = ends.get(1..ends.len().saturating_sub(1)).unwrap_or(&[]);
        inner
            .iter()
            .any(|&joint| space.intersects_point(joint, joint_margin))
            || space.intersects_polyline(&ends)
    }

    /// Returns the pivot followed by the far end of every link.
    #[must_use]
    pub fn link_ends(&self) -> Vec<Point2<f64>> {
        chain::link_ends(self.pivot, &self.lengths, self.angles.as_slice())
            .unwrap_or_else(|_| vec![self.pivot])
    }

    /// Returns the position of the free end.
    #[must_use]
    pub fn free_end(&self) -> Point2<f64> {
        self.link_ends().last().copied().unwrap_or(self.pivot)
    }

    /// Returns the distance from the free end to the goal.
    #[must_use]
    pub fn distance_to_goal(&self) -> f64 {
        (self.goal - self.free_end()).norm()
    }

    /// Returns `true` if the free end is within the reach slack of the goal.
    #[must_use]
    pub fn is_at_goal(&self) -> bool {
        self.distance_to_goal() < self.config.reach_slack()
    }

    /// Returns the anchored end.
    #[must_use]
    pub const fn pivot(&self) -> Point2<f64> {
        self.pivot
    }

    /// Returns the current goal.
    #[must_use]
    pub const fn goal(&self) -> Point2<f64> {
        self.goal
    }

    /// Returns the link lengths, pivot side first.
    #[must_use]
    pub fn lengths(&self) -> &[f64] {
        &self.lengths
    }

    /// Returns the relative joint angles, pivot side first.
    #[must_use]
    pub const fn angles(&self) -> &DVector<f64> {
        &self.angles
    }

    pub(crate) const fn angles_mut(&mut self) -> &mut DVector<f64> {
        &mut self.angles
    }

    /// Returns the number of links.
    #[must_use]
    pub fn links(&self) -> usize {
        self.lengths.len()
    }

    /// Returns `true` while the pivot is the end the chain was spawned with.
    #[must_use]
    pub const fn is_forward_oriented(&self) -> bool {
        self.forward
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &LimbConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use planar_space::Obstacle;
    use std::f64::consts::{FRAC_PI_2, PI, TAU};

    fn config() -> LimbConfig {
        LimbConfig::default().with_seed(42)
    }

    // ==================== Spawn Tests ====================

    #[test]
    fn test_new_limb_is_straight() {
        let limb = LimbChain::new(3, config()).unwrap();
        assert_eq!(limb.links(), 3);
        assert_relative_eq!(limb.free_end(), Point2::new(3.0, 0.0), epsilon = 1e-12);
        assert!(limb.is_at_goal());
    }

    #[test]
    fn test_new_rejects_empty_chain() {
        assert!(matches!(
            LimbChain::new(0, config()),
            Err(LimbError::Ik(IkError::EmptyChain))
        ));
    }

    #[test]
    fn test_spawn_sets_pose() {
        let mut limb = LimbChain::new(2, config()).unwrap();
        limb.spawn(Point2::new(1.0, 2.0), &[3.0, 4.0], &[0.5 + TAU, 0.0])
            .unwrap();

        assert_eq!(limb.pivot(), Point2::new(1.0, 2.0));
        assert_eq!(limb.lengths(), &[3.0, 4.0]);
        assert_relative_eq!(limb.angles()[0], 0.5, epsilon = 1e-12);
        assert_eq!(limb.goal(), limb.free_end());
        assert!(limb.is_forward_oriented());
    }

    #[test]
    fn test_spawn_shape_mismatch_leaves_limb_untouched() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[1.0, 1.0], &[0.1, 0.2], config()).unwrap();
        let before = limb.clone();

        let result = limb.spawn(Point2::new(9.0, 9.0), &[1.0, 1.0, 1.0], &[0.0, 0.0, 0.0]);

        assert!(matches!(
            result,
            Err(LimbError::ShapeMismatch { expected: 2, lengths: 3, angles: 3 })
        ));
        assert_eq!(limb.pivot(), before.pivot());
        assert_eq!(limb.angles(), before.angles());
        assert_eq!(limb.lengths(), before.lengths());
    }

    #[test]
    fn test_spawn_rejects_non_positive_length() {
        let mut limb = LimbChain::new(2, config()).unwrap();
        let result = limb.spawn(Point2::origin(), &[1.0, 0.0], &[0.0, 0.0]);
        assert!(result.unwrap_err().is_ik());
        assert_eq!(limb.lengths(), &[1.0, 1.0]);
    }

    // ==================== Update Tests ====================

    #[test]
    fn test_update_at_goal_is_reached_and_still() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[10.0, 10.0], &[0.5, 0.5], config()).unwrap();
        let angles = limb.angles().clone();

        assert!(limb.update(0.01, 1.0));
        assert_eq!(limb.angles(), &angles);
    }

    #[test]
    fn test_zero_dt_changes_nothing() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[5.0, 5.0], &[0.5, 0.5], config()).unwrap();
        limb.set_goal(Point2::new(-3.0, 4.0));
        let angles = limb.angles().clone();

        assert!(!limb.update(0.0, 0.5));
        assert_eq!(limb.angles(), &angles);
        assert_eq!(limb.pivot(), Point2::origin());
    }

    #[test]
    fn test_update_converges() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[5.0, 5.0, 5.0], &[0.2, 0.2, 0.2], config()).unwrap();
        limb.set_goal(Point2::new(8.0, 6.0));

        let steps = (0..20_000).take_while(|_| !limb.update(0.001, 0.0)).count();
        assert!(steps < 20_000);
        assert!(limb.distance_to_goal() < 1.0);
    }

    #[test]
    fn test_slow_step_is_raised_to_min_speed() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[5.0, 5.0], &[0.5, 0.5], config()).unwrap();
        limb.set_goal(Point2::new(-3.0, 4.0));
        let before = limb.angles().clone();

        assert!(limb.ik_delta(1e-5).norm() < 0.1);
        limb.update(1e-5, 0.1);

        assert_relative_eq!((limb.angles() - before).norm(), 0.1, epsilon = 1e-9);
    }

    #[test]
    fn test_singular_step_gets_jerk() {
        // Straight chain pointing at an unreachable goal on its own axis: Jt*e = 0
        let mut limb = LimbChain::spawned(Point2::origin(), &[1.0, 1.0], &[0.0, 0.0], config()).unwrap();
        limb.set_goal(Point2::new(5.0, 0.0));
        assert_relative_eq!(limb.ik_delta(0.1).norm(), 0.0, epsilon = 1e-12);

        limb.update(0.1, 0.0);

        let moved = limb.angles().clone();
        assert!(moved.norm() > 0.0);
        assert!(moved.iter().all(|&q| (0.0..1.0 / 3.0).contains(&q)));
    }

    #[test]
    fn test_jerk_is_reproducible_with_seed() {
        let run = || {
            let mut limb = LimbChain::spawned(Point2::origin(), &[1.0, 1.0], &[0.0, 0.0], config()).unwrap();
            limb.set_goal(Point2::new(5.0, 0.0));
            limb.update(0.1, 0.0);
            limb.angles().clone()
        };
        assert_eq!(run(), run());
    }

    // ==================== Pivot Switch Tests ====================

    #[test]
    fn test_switch_pivot_reexpresses_chain() {
        let mut limb = LimbChain::spawned(Point2::origin(), &[2.0, 1.0], &[0.0, FRAC_PI_2], config()).unwrap();
        limb.switch_pivot();

        assert_relative_eq!(limb.pivot(), Point2::new(2.0, 1.0), epsilon = 1e-12);
        assert_eq!(limb.lengths(), &[1.0, 2.0]);
        assert_relative_eq!(limb.angles()[0], -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(limb.angles()[1], -FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(limb.free_end(), Point2::origin(), epsilon = 1e-12);
        assert!(!limb.is_forward_oriented());
    }

    #[test]
    fn test_double_switch_restores_free_end() {
        let mut limb = LimbChain::spawned(
            Point2::new(-4.0, 3.0),
            &[3.0, 1.0, 2.5, 0.5],
            &[0.4, -1.2, 2.9, 0.7],
            config(),
        )
        .unwrap();
        let pivot = limb.pivot();
        let tip = limb.free_end();

        limb.switch_pivot();
        limb.switch_pivot();

        assert_relative_eq!(limb.pivot(), pivot, epsilon = 1e-9);
        assert_relative_eq!(limb.free_end(), tip, epsilon = 1e-9);
        assert_eq!(limb.lengths(), &[3.0, 1.0, 2.5, 0.5]);
        assert!(limb.is_forward_oriented());
        assert!(limb.angles().iter().all(|&q| q > -PI && q <= PI));
    }

    // ==================== Collision Tests ====================

    #[test]
    fn test_intersects_wall() {
        let limb = LimbChain::spawned(Point2::origin(), &[2.0, 2.0], &[0.0, 0.0], config()).unwrap();
        let wall = [Obstacle::segment(Point2::new(3.0, -1.0), Point2::new(3.0, 1.0)).unwrap()];
        assert!(limb.intersects(ConfigurationSpace::new(&wall), 0.0));
        assert!(!limb.intersects(ConfigurationSpace::empty(), 5.0));
    }

    #[test]
    fn test_inner_joint_margin() {
        // Inner joint at (2, 0) is 0.5 from the circle's rim
        let limb = LimbChain::spawned(Point2::origin(), &[2.0, 2.0], &[0.0, FRAC_PI_2], config()).unwrap();
        let circle = [Obstacle::circle(Point2::new(2.0, -1.5), 1.0).unwrap()];
        let space = ConfigurationSpace::new(&circle);

        assert!(limb.intersects(space, 0.6));
        assert!(!limb.intersects(space, 0.4));
    }
}
