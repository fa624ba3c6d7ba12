//! A body carried along a route by several limbs taking turns.
//!
//! All limbs hang off one body point (the neck). A [`Creature`] cycles
//! through two gaits:
//!
//! 1. **Reach**: the moving limb, anchored at the neck, reaches for the next
//!    waypoint. A limb that is still anchored on its hand from the last pull
//!    switches pivot first, which puts its pivot back on the neck.
//! 2. **Pull**: every limb anchors on its hand, the neck slides toward the
//!    planted waypoint plus the body offset, and each limb's free end keeps
//!    up with the neck. Once the neck arrives the next limb in turn moves.
//!
//! With an [`EnergyConfig`](crate::EnergyConfig) every planted limb costs
//! energy and lowers the speed floor; an exhausted creature stands still
//! until it has recharged.

use nalgebra::Point2;
use roadmap_types::Route;
use tracing::{debug, info};

use crate::config::CreatureConfig;
use crate::error::LimbError;
use crate::limb::LimbChain;

/// What a [`Creature`] is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gait {
    /// The moving limb reaches for the next waypoint.
    Reach,
    /// The body follows the limb that just planted.
    Pull,
}

/// A multi-limb walker: two or more limbs sharing a neck, moving one at a time.
///
/// # Example
///
/// ```
/// use limb_control::{Creature, CreatureConfig, LimbConfig};
/// use roadmap_types::{MilestoneId, Route, Waypoint};
/// use nalgebra::Point2;
///
/// let route = Route::new(
///     [0.0, 5.0, 10.0]
///         .iter()
///         .enumerate()
///         .map(|(i, &x)| Waypoint::new(MilestoneId::new(i), Point2::new(x, 0.0)))
///         .collect(),
/// );
///
/// let config = CreatureConfig::default().with_limb(LimbConfig::default().with_seed(1));
/// let mut creature = Creature::new(
///     vec![4.0, 4.0],
///     vec![vec![0.3, -0.6], vec![0.3, -0.6]],
///     config,
/// )
/// .unwrap();
/// creature.spawn(route).unwrap();
///
/// let finished = (0..50_000).any(|_| creature.update(1e-3));
/// assert!(finished);
/// assert!((creature.neck() - Point2::new(10.0, -2.0)).norm() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct Creature {
    limbs: Vec<LimbChain>,
    spawn_lengths: Vec<f64>,
    spawn_angles: Vec<Vec<f64>>,
    neck: Point2<f64>,
    neck_goal: Point2<f64>,
    route: Route,
    next: usize,
    moving: usize,
    gait: Gait,
    min_speed: f64,
    energy: f64,
    recharging: bool,
    planted: usize,
    config: CreatureConfig,
}

impl Creature {
    /// Creates a creature whose limbs all have `lengths`, one angle list per limb.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] for an invalid configuration or
    /// fewer than two limbs, and the [`LimbChain::spawned`] errors for bad
    /// lengths or angle lists.
    pub fn new(
        lengths: Vec<f64>,
        limb_angles: Vec<Vec<f64>>,
        config: CreatureConfig,
    ) -> Result<Self, LimbError> {
        config.validate()?;
        if limb_angles.len() < 2 {
            return Err(LimbError::invalid_config(format!(
                "a creature needs at least two limbs, got {}",
                limb_angles.len()
            )));
        }
        let limbs = limb_angles
            .iter()
            .map(|angles| LimbChain::spawned(Point2::origin(), &lengths, angles, *config.limb()))
            .collect::<Result<Vec<_>, _>>()?;
        let energy = config.energy().map_or(0.0, |e| e.capacity());

        Ok(Self {
            limbs,
            spawn_lengths: lengths,
            spawn_angles: limb_angles,
            neck: Point2::origin(),
            neck_goal: Point2::origin(),
            route: Route::default(),
            next: 0,
            moving: 0,
            gait: Gait::Reach,
            min_speed: config.min_speed(),
            energy,
            recharging: false,
            planted: 0,
            config,
        })
    }

    /// Places the neck at the route's start plus the body offset and starts
    /// the first limb reaching.
    ///
    /// Energy and the speed floor are restored.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::NoActiveRoute`] for an empty route.
    pub fn spawn(&mut self, route: Route) -> Result<(), LimbError> {
        let start = route.start().ok_or(LimbError::NoActiveRoute)?.position;
        let neck = start + self.config.body_offset();
        for (limb, angles) in self.limbs.iter_mut().zip(&self.spawn_angles) {
            limb.spawn(neck, &self.spawn_lengths, angles)?;
        }

        self.neck = neck;
        self.neck_goal = neck;
        self.route = route;
        self.next = 1;
        self.moving = 0;
        self.gait = Gait::Reach;
        self.min_speed = self.config.min_speed();
        self.energy = self.config.energy().map_or(0.0, |e| e.capacity());
        self.recharging = false;
        self.planted = 0;
        self.begin_reach();
        info!(
            limbs = self.limbs.len(),
            waypoints = self.route.len(),
            "Spawned creature"
        );
        Ok(())
    }

    /// Advances the creature by one timestep. Returns `true` once the route is finished.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.is_finished() {
            return true;
        }
        if self.recharge() {
            return false;
        }

        match self.gait {
            Gait::Reach => {
                if self.limbs[self.moving].update(dt, self.min_speed) {
                    self.plant();
                }
            }
            Gait::Pull => self.pull(dt),
        }
        self.is_finished()
    }

    fn begin_reach(&mut self) {
        let Some(target) = self.route.get(self.next).map(|w| w.position) else {
            return;
        };
        let limb = &mut self.limbs[self.moving];
        if !limb.is_forward_oriented() {
            limb.switch_pivot();
        }
        limb.set_goal(target);
    }

    fn plant(&mut self) {
        let Some(target) = self.route.get(self.next).map(|w| w.position) else {
            return;
        };
        self.planted += 1;
        self.tire();

        self.neck_goal = target + self.config.body_offset();
        for limb in &mut self.limbs {
            if limb.is_forward_oriented() {
                limb.switch_pivot();
            }
            limb.set_goal(self.neck);
        }
        self.gait = Gait::Pull;
        debug!(
            limb = self.moving,
            waypoint = self.next,
            energy = self.energy,
            "Planted limb"
        );
    }

    fn pull(&mut self, dt: f64) {
        self.neck += (self.neck_goal - self.neck) * self.config.body_speed();
        for limb in &mut self.limbs {
            limb.set_goal(self.neck);
            for _ in 0..self.config.sync_iterations() {
                if limb.update(dt, self.min_speed) {
                    break;
                }
            }
        }

        if (self.neck_goal - self.neck).norm() < self.config.limb().reach_slack() {
            self.next += 1;
            self.moving = (self.moving + 1) % self.limbs.len();
            self.gait = Gait::Reach;
            self.begin_reach();
        }
    }

    fn tire(&mut self) {
        if let Some(energy) = self.config.energy() {
            self.energy -= energy.step_cost() * self.energy;
            self.min_speed = (self.min_speed - energy.speed_decay()).max(0.0);
        }
    }

    /// Returns `true` while the creature spends this update recharging.
    fn recharge(&mut self) -> bool {
        let Some(energy) = self.config.energy().copied() else {
            return false;
        };
        if !self.recharging && self.energy <= energy.recharge_below() {
            info!(energy = self.energy, "Exhausted, recharging");
            self.recharging = true;
        }
        if !self.recharging {
            return false;
        }

        self.energy = (self.energy + energy.recovery_rate()).min(energy.capacity());
        self.min_speed = self.config.min_speed();
        if self.energy >= energy.capacity() {
            debug!("Recharged");
            self.recharging = false;
        }
        true
    }

    /// Returns `true` when no waypoint is left to reach.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next >= self.route.len()
    }

    /// Returns `true` while the creature stands still to regain energy.
    #[must_use]
    pub const fn is_recharging(&self) -> bool {
        self.recharging
    }

    /// Returns the current gait.
    #[must_use]
    pub const fn gait(&self) -> Gait {
        self.gait
    }

    /// Returns the body point every limb hangs off.
    #[must_use]
    pub const fn neck(&self) -> Point2<f64> {
        self.neck
    }

    /// Returns the limbs.
    #[must_use]
    pub fn limbs(&self) -> &[LimbChain] {
        &self.limbs
    }

    /// Returns the index of the limb whose turn it is.
    #[must_use]
    pub const fn moving_limb(&self) -> usize {
        self.moving
    }

    /// Returns the index of the waypoint being reached for.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.next
    }

    /// Returns how many limbs have been planted since spawning.
    #[must_use]
    pub const fn planted(&self) -> usize {
        self.planted
    }

    /// Returns the energy level, `None` without a fatigue model.
    #[must_use]
    pub fn energy(&self) -> Option<f64> {
        self.config.energy().map(|_| self.energy)
    }

    /// Returns the current speed floor.
    #[must_use]
    pub const fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// Returns the route being walked.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &CreatureConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::{EnergyConfig, LimbConfig};
    use approx::assert_relative_eq;
    use nalgebra::Vector2;
    use roadmap_types::{MilestoneId, Waypoint};

    fn line(xs: &[f64]) -> Route {
        Route::new(
            xs.iter()
                .enumerate()
                .map(|(i, &x)| Waypoint::new(MilestoneId::new(i), Point2::new(x, 0.0)))
                .collect(),
        )
    }

    fn config() -> CreatureConfig {
        CreatureConfig::default().with_limb(LimbConfig::default().with_seed(6))
    }

    fn two_arms(config: CreatureConfig) -> Creature {
        Creature::new(vec![4.0, 4.0], vec![vec![0.3, -0.6], vec![0.3, -0.6]], config).unwrap()
    }

    #[test]
    fn test_needs_two_limbs() {
        let result = Creature::new(vec![4.0, 4.0], vec![vec![0.0, 0.0]], config());
        assert!(matches!(result, Err(LimbError::InvalidConfig(_))));

        let mismatch = Creature::new(vec![4.0, 4.0], vec![vec![0.0], vec![0.0, 0.0]], config());
        assert!(mismatch.unwrap_err().is_shape_mismatch());
    }

    #[test]
    fn test_spawn_hangs_neck_below_start() {
        let mut creature = two_arms(config());
        assert!(matches!(creature.spawn(Route::default()), Err(LimbError::NoActiveRoute)));

        creature.spawn(line(&[3.0, 8.0])).unwrap();
        assert_eq!(creature.neck(), Point2::new(3.0, -2.0));
        assert_eq!(creature.gait(), Gait::Reach);
        assert_eq!(creature.next_index(), 1);
        for limb in creature.limbs() {
            assert_eq!(limb.pivot(), Point2::new(3.0, -2.0));
            assert!(limb.is_forward_oriented());
        }
        assert_eq!(creature.limbs()[0].goal(), Point2::new(8.0, 0.0));
    }

    #[test]
    fn test_limbs_take_turns() {
        let mut creature = two_arms(config());
        creature.spawn(line(&[0.0, 5.0, 10.0, 15.0, 20.0])).unwrap();

        let mut movers = vec![creature.moving_limb()];
        let mut pulling = false;
        for _ in 0..200_000 {
            if creature.update(1e-3) {
                break;
            }
            if creature.gait() == Gait::Pull {
                pulling = true;
            } else if pulling {
                // Each pull ends with the other limb's turn
                pulling = false;
                movers.push(creature.moving_limb());
                assert!(creature.limbs()[creature.moving_limb()].is_forward_oriented());
            }
        }

        assert!(creature.is_finished());
        assert_eq!(creature.planted(), 4);
        assert_eq!(movers, vec![0, 1, 0, 1]);
        assert_relative_eq!(creature.neck(), Point2::new(20.0, -2.0), epsilon = 1.0);
    }

    #[test]
    fn test_pull_anchors_every_limb_on_its_hand() {
        let mut creature = two_arms(config());
        creature.spawn(line(&[0.0, 5.0, 10.0])).unwrap();

        while creature.gait() == Gait::Reach {
            creature.update(1e-3);
        }
        assert!(creature.limbs().iter().all(|l| !l.is_forward_oriented()));
        assert!((creature.limbs()[0].pivot() - Point2::new(5.0, 0.0)).norm() < 1.0);

        let before = creature.neck();
        creature.update(1e-3);
        let goal = Point2::new(5.0, -2.0);
        assert!((creature.neck() - goal).norm() < (before - goal).norm());
    }

    #[test]
    fn test_four_limbs_cycle_in_order() {
        let angles = vec![vec![0.3, -0.6]; 4];
        let mut creature = Creature::new(vec![4.0, 4.0], angles, config()).unwrap();
        creature.spawn(line(&[0.0, 4.0, 8.0, 12.0, 16.0])).unwrap();

        let mut movers = Vec::new();
        for _ in 0..200_000 {
            if movers.last() != Some(&creature.moving_limb()) {
                movers.push(creature.moving_limb());
            }
            if creature.update(1e-3) {
                break;
            }
        }
        assert!(creature.is_finished());
        assert_eq!(movers, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_exhausted_creature_recharges_in_place() {
        let energy = EnergyConfig::default()
            .with_capacity(10.0)
            .with_step_cost(0.5)
            .with_recharge_below(5.0)
            .with_recovery_rate(1.0)
            .with_speed_decay(0.001);
        let mut creature = two_arms(config().with_energy(energy));
        creature.spawn(line(&[0.0, 5.0, 10.0])).unwrap();
        assert_eq!(creature.energy(), Some(10.0));

        while creature.planted() == 0 {
            creature.update(1e-3);
        }
        assert_eq!(creature.energy(), Some(5.0));
        assert_relative_eq!(creature.min_speed(), 0.005, epsilon = 1e-12);

        // Five updates of recovery, frozen in place
        let neck = creature.neck();
        let angles: Vec<_> = creature.limbs().iter().map(|l| l.angles().clone()).collect();
        for step in 1..=5 {
            assert!(!creature.update(1e-3));
            assert_eq!(creature.energy(), Some(5.0 + f64::from(step)));
            assert_eq!(creature.neck(), neck);
        }
        assert!(!creature.is_recharging());
        assert_eq!(creature.min_speed(), 0.006);
        for (limb, before) in creature.limbs().iter().zip(&angles) {
            assert_eq!(limb.angles(), before);
        }

        // Back to pulling
        creature.update(1e-3);
        assert_ne!(creature.neck(), neck);
    }

    #[test]
    fn test_without_energy_never_recharges() {
        let mut creature = two_arms(config().with_body_offset(Vector2::new(0.0, -1.5)));
        creature.spawn(line(&[0.0, 5.0, 10.0])).unwrap();
        assert!(creature.energy().is_none());

        let finished = (0..100_000).any(|_| {
            assert!(!creature.is_recharging());
            creature.update(1e-3)
        });
        assert!(finished);
        assert_eq!(creature.min_speed(), 0.006);
        assert!(creature.update(1e-3));
    }
}
