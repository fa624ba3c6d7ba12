//! Configuration for limb controllers and replanning.
//!
//! Every tuning constant lives in one of these structs and is handed to a
//! controller at construction.
//!
//! # Example
//!
//! ```
//! use limb_control::{FollowerConfig, LimbConfig};
//! use limb_ik::IkMethod;
//!
//! let config = FollowerConfig::default()
//!     .with_limb(LimbConfig::default().with_method(IkMethod::pseudo_inverse(0.1)).with_seed(7))
//!     .with_initial_min_speed(0.05);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.limb().seed(), Some(7));
//! ```

use limb_ik::IkMethod;
use nalgebra::Vector2;
use roadmap_types::{EdgeBand, SearchStrategy};

use crate::error::LimbError;

/// Tuning for a single [`LimbChain`](crate::LimbChain).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimbConfig {
    /// The goal counts as reached once the free end is closer than this.
    reach_slack: f64,
    /// Steps with a smaller norm get a random jerk added.
    jerk_threshold: f64,
    /// Iterative IK method.
    method: IkMethod,
    /// Seed for the jerk generator; `None` uses OS entropy.
    seed: Option<u64>,
}

impl Default for LimbConfig {
    fn default() -> Self {
        Self {
            reach_slack: 1.0,
            jerk_threshold: 1e-6,
            method: IkMethod::JacobianTranspose,
            seed: None,
        }
    }
}

impl LimbConfig {
    /// Sets the reach slack.
    #[must_use]
    pub const fn with_reach_slack(mut self, slack: f64) -> Self {
        self.reach_slack = slack;
        self
    }

    /// Sets the jerk threshold.
    #[must_use]
    pub const fn with_jerk_threshold(mut self, threshold: f64) -> Self {
        self.jerk_threshold = threshold;
        self
    }

    /// Sets the IK method.
    #[must_use]
    pub const fn with_method(mut self, method: IkMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets a reproducible seed for the jerk generator.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Returns the reach slack.
    #[must_use]
    pub const fn reach_slack(&self) -> f64 {
        self.reach_slack
    }

    /// Returns the jerk threshold.
    #[must_use]
    pub const fn jerk_threshold(&self) -> f64 {
        self.jerk_threshold
    }

    /// Returns the IK method.
    #[must_use]
    pub const fn method(&self) -> IkMethod {
        self.method
    }

    /// Returns the seed, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] for a non-positive reach slack,
    /// a negative jerk threshold or a negative damping factor.
    pub fn validate(&self) -> Result<(), LimbError> {
        if !self.reach_slack.is_finite() || self.reach_slack <= 0.0 {
            return Err(LimbError::invalid_config(format!(
                "reach_slack must be finite and positive, got {}",
                self.reach_slack
            )));
        }
        if !self.jerk_threshold.is_finite() || self.jerk_threshold < 0.0 {
            return Err(LimbError::invalid_config(format!(
                "jerk_threshold must be finite and non-negative, got {}",
                self.jerk_threshold
            )));
        }
        if let IkMethod::PseudoInverse { damping } = self.method {
            if !damping.is_finite() || damping < 0.0 {
                return Err(LimbError::invalid_config(format!(
                    "damping must be finite and non-negative, got {damping}"
                )));
            }
        }
        Ok(())
    }
}

/// Tuning for a [`RouteFollower`](crate::RouteFollower).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FollowerConfig {
    /// Configuration of the underlying limb.
    limb: LimbConfig,
    /// Speed floor used until the first step toward a goal captures one.
    initial_min_speed: f64,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            limb: LimbConfig::default(),
            initial_min_speed: 1e-2,
        }
    }
}

impl FollowerConfig {
    /// Sets the limb configuration.
    #[must_use]
    pub const fn with_limb(mut self, limb: LimbConfig) -> Self {
        self.limb = limb;
        self
    }

    /// Sets the initial speed floor.
    #[must_use]
    pub const fn with_initial_min_speed(mut self, speed: f64) -> Self {
        self.initial_min_speed = speed;
        self
    }

    /// Returns the limb configuration.
    #[must_use]
    pub const fn limb(&self) -> &LimbConfig {
        &self.limb
    }

    /// Returns the initial speed floor.
    #[must_use]
    pub const fn initial_min_speed(&self) -> f64 {
        self.initial_min_speed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] if the limb configuration is
    /// invalid or the initial speed floor is negative.
    pub fn validate(&self) -> Result<(), LimbError> {
        self.limb.validate()?;
        if !self.initial_min_speed.is_finite() || self.initial_min_speed < 0.0 {
            return Err(LimbError::invalid_config(format!(
                "initial_min_speed must be finite and non-negative, got {}",
                self.initial_min_speed
            )));
        }
        Ok(())
    }
}

/// Tuning for an [`AnalyticReacher`](crate::AnalyticReacher).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyticConfig {
    /// Joint-space distance at which the target pose counts as reached.
    joint_slack: f64,
    /// Lower bound on each joint's speed while it is away from its target.
    min_joint_speed: f64,
}

impl Default for AnalyticConfig {
    fn default() -> Self {
        Self {
            joint_slack: 0.01,
            min_joint_speed: 0.5,
        }
    }
}

impl AnalyticConfig {
    /// Sets the joint slack.
    #[must_use]
    pub const fn with_joint_slack(mut self, slack: f64) -> Self {
        self.joint_slack = slack;
        self
    }

    /// Sets the minimum joint speed.
    #[must_use]
    pub const fn with_min_joint_speed(mut self, speed: f64) -> Self {
        self.min_joint_speed = speed;
        self
    }

    /// Returns the joint slack.
    #[must_use]
    pub const fn joint_slack(&self) -> f64 {
        self.joint_slack
    }

    /// Returns the minimum joint speed.
    #[must_use]
    pub const fn min_joint_speed(&self) -> f64 {
        self.min_joint_speed
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] unless both values are finite and positive.
    pub fn validate(&self) -> Result<(), LimbError> {
        if !self.joint_slack.is_finite() || self.joint_slack <= 0.0 {
            return Err(LimbError::invalid_config(format!(
                "joint_slack must be finite and positive, got {}",
                self.joint_slack
            )));
        }
        if !self.min_joint_speed.is_finite() || self.min_joint_speed <= 0.0 {
            return Err(LimbError::invalid_config(format!(
                "min_joint_speed must be finite and positive, got {}",
                self.min_joint_speed
            )));
        }
        Ok(())
    }
}

/// Tuning for a [`Replanner`](crate::Replanner).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReplanConfig {
    /// Strategy used for the new search.
    strategy: SearchStrategy,
    /// Edge band used when inserting the new endpoints.
    band: EdgeBand,
    /// Clearance the limb's inner joints must keep from obstacles.
    joint_margin: f64,
}

impl ReplanConfig {
    /// Creates a configuration searching with A* over `band`.
    #[must_use]
    pub const fn new(band: EdgeBand) -> Self {
        Self {
            strategy: SearchStrategy::AStar,
            band,
            joint_margin: 5.0,
        }
    }

    /// Sets the search strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the edge band.
    #[must_use]
    pub const fn with_band(mut self, band: EdgeBand) -> Self {
        self.band = band;
        self
    }

    /// Sets the joint clearance margin.
    #[must_use]
    pub const fn with_joint_margin(mut self, margin: f64) -> Self {
        self.joint_margin = margin;
        self
    }

    /// Returns the search strategy.
    #[must_use]
    pub const fn strategy(&self) -> SearchStrategy {
        self.strategy
    }

    /// Returns the edge band.
    #[must_use]
    pub const fn band(&self) -> EdgeBand {
        self.band
    }

    /// Returns the joint clearance margin.
    #[must_use]
    pub const fn joint_margin(&self) -> f64 {
        self.joint_margin
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::Planning`] for an invalid strategy and
    /// [`LimbError::InvalidConfig`] for a negative joint margin.
    pub fn validate(&self) -> Result<(), LimbError> {
        self.strategy.validate()?;
        if !self.joint_margin.is_finite() || self.joint_margin < 0.0 {
            return Err(LimbError::invalid_config(format!(
                "joint_margin must be finite and non-negative, got {}",
                self.joint_margin
            )));
        }
        Ok(())
    }
}

/// Fatigue model for a [`Creature`](crate::Creature).
///
/// Each planted limb costs `step_cost` of the remaining energy and lowers
/// the speed floor by `speed_decay`. At or below `recharge_below` the
/// creature stops and regains `recovery_rate` per update until full.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnergyConfig {
    capacity: f64,
    step_cost: f64,
    recharge_below: f64,
    recovery_rate: f64,
    speed_decay: f64,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            capacity: 100.0,
            step_cost: 0.05,
            recharge_below: 5.0,
            recovery_rate: 0.01,
            speed_decay: 5e-5,
        }
    }
}

impl EnergyConfig {
    /// Sets the full energy level.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the fraction of remaining energy spent per planted limb.
    #[must_use]
    pub const fn with_step_cost(mut self, cost: f64) -> Self {
        self.step_cost = cost;
        self
    }

    /// Sets the level that triggers recharging.
    #[must_use]
    pub const fn with_recharge_below(mut self, level: f64) -> Self {
        self.recharge_below = level;
        self
    }

    /// Sets the energy regained per update while recharging.
    #[must_use]
    pub const fn with_recovery_rate(mut self, rate: f64) -> Self {
        self.recovery_rate = rate;
        self
    }

    /// Sets the speed floor reduction per planted limb.
    #[must_use]
    pub const fn with_speed_decay(mut self, decay: f64) -> Self {
        self.speed_decay = decay;
        self
    }

    /// Returns the full energy level.
    #[must_use]
    pub const fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns the fraction of remaining energy spent per planted limb.
    #[must_use]
    pub const fn step_cost(&self) -> f64 {
        self.step_cost
    }

    /// Returns the level that triggers recharging.
    #[must_use]
    pub const fn recharge_below(&self) -> f64 {
        self.recharge_below
    }

    /// Returns the energy regained per update while recharging.
    #[must_use]
    pub const fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Returns the speed floor reduction per planted limb.
    #[must_use]
    pub const fn speed_decay(&self) -> f64 {
        self.speed_decay
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] unless `0 <= recharge_below < capacity`,
    /// `step_cost` lies in `[0, 1)`, `recovery_rate` is positive and
    /// `speed_decay` is non-negative.
    pub fn validate(&self) -> Result<(), LimbError> {
        let finite = [
            self.capacity,
            self.step_cost,
            self.recharge_below,
            self.recovery_rate,
            self.speed_decay,
        ]
        .iter()
        .all(|v| v.is_finite());
        if !finite {
            return Err(LimbError::invalid_config("energy parameters must be finite"));
        }
        if self.recharge_below < 0.0 || self.recharge_below >= self.capacity {
            return Err(LimbError::invalid_config(format!(
                "recharge_below must lie in [0, {}), got {}",
                self.capacity, self.recharge_below
            )));
        }
        if !(0.0..1.0).contains(&self.step_cost) {
            return Err(LimbError::invalid_config(format!(
                "step_cost must lie in [0, 1), got {}",
                self.step_cost
            )));
        }
        if self.recovery_rate <= 0.0 || self.speed_decay < 0.0 {
            return Err(LimbError::invalid_config(
                "recovery_rate must be positive and speed_decay non-negative",
            ));
        }
        Ok(())
    }
}

/// Tuning for a [`Creature`](crate::Creature).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureConfig {
    /// Configuration shared by every limb.
    limb: LimbConfig,
    /// Speed floor for every limb step.
    min_speed: f64,
    /// Fraction of the remaining gap the body closes per update.
    body_speed: f64,
    /// Limb steps per update spent keeping up with the body.
    sync_iterations: usize,
    /// Where the body settles relative to a freshly planted limb.
    body_offset: Vector2<f64>,
    /// Fatigue model; `None` never tires.
    energy: Option<EnergyConfig>,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            limb: LimbConfig::default(),
            min_speed: 0.006,
            body_speed: 0.01,
            sync_iterations: 150,
            body_offset: Vector2::new(0.0, -2.0),
            energy: None,
        }
    }
}

impl CreatureConfig {
    /// Sets the limb configuration.
    #[must_use]
    pub const fn with_limb(mut self, limb: LimbConfig) -> Self {
        self.limb = limb;
        self
    }

    /// Sets the speed floor.
    #[must_use]
    pub const fn with_min_speed(mut self, speed: f64) -> Self {
        self.min_speed = speed;
        self
    }

    /// Sets the body speed.
    #[must_use]
    pub const fn with_body_speed(mut self, speed: f64) -> Self {
        self.body_speed = speed;
        self
    }

    /// Sets the limb steps per update while the body moves.
    #[must_use]
    pub const fn with_sync_iterations(mut self, iterations: usize) -> Self {
        self.sync_iterations = iterations;
        self
    }

    /// Sets the body offset from a planted limb.
    #[must_use]
    pub const fn with_body_offset(mut self, offset: Vector2<f64>) -> Self {
        self.body_offset = offset;
        self
    }

    /// Enables fatigue.
    #[must_use]
    pub const fn with_energy(mut self, energy: EnergyConfig) -> Self {
        self.energy = Some(energy);
        self
    }

    /// Returns the limb configuration.
    #[must_use]
    pub const fn limb(&self) -> &LimbConfig {
        &self.limb
    }

    /// Returns the speed floor.
    #[must_use]
    pub const fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// Returns the body speed.
    #[must_use]
    pub const fn body_speed(&self) -> f64 {
        self.body_speed
    }

    /// Returns the limb steps per update while the body moves.
    #[must_use]
    pub const fn sync_iterations(&self) -> usize {
        self.sync_iterations
    }

    /// Returns the body offset from a planted limb.
    #[must_use]
    pub const fn body_offset(&self) -> Vector2<f64> {
        self.body_offset
    }

    /// Returns the fatigue model, if any.
    #[must_use]
    pub const fn energy(&self) -> Option<&EnergyConfig> {
        self.energy.as_ref()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::InvalidConfig`] for an invalid limb or energy
    /// configuration, a negative speed floor, a body speed outside `(0, 1]`,
    /// zero sync iterations or a non-finite offset.
    pub fn validate(&self) -> Result<(), LimbError> {
        self.limb.validate()?;
        if let Some(energy) = &self.energy {
            energy.validate()?;
        }
        if !self.min_speed.is_finite() || self.min_speed < 0.0 {
            return Err(LimbError::invalid_config(format!(
                "min_speed must be finite and non-negative, got {}",
                self.min_speed
            )));
        }
        if !(self.body_speed > 0.0 && self.body_speed <= 1.0) {
            return Err(LimbError::invalid_config(format!(
                "body_speed must lie in (0, 1], got {}",
                self.body_speed
            )));
        }
        if self.sync_iterations == 0 {
            return Err(LimbError::invalid_config("sync_iterations must be positive"));
        }
        if !self.body_offset.iter().all(|v| v.is_finite()) {
            return Err(LimbError::invalid_config("body_offset must be finite"));
        }
        Ok(())
    }
}
