//! Two-link route walker driven in joint space by the closed-form solver.

use limb_ik::solve_analytic;
use nalgebra::Point2;
use planar_space::geometry::wrap_angle;
use roadmap_types::{Route, Waypoint};
use tracing::{debug, warn};

use crate::config::{AnalyticConfig, LimbConfig};
use crate::error::LimbError;
use crate::limb::LimbChain;

/// Walks a route with a two-link limb, interpolating joints toward analytic targets.
///
/// For each waypoint the target joint pair is solved exactly with
/// [`solve_analytic`]. Every update turns each joint the short way round
/// toward its target at no less than `min_joint_speed` (never past it). Within `joint_slack` of the
/// target pose the limb switches pivot and solves for the next waypoint. A
/// waypoint out of reach of the new pivot stalls the walker instead of
/// producing NaN angles.
///
/// # Example
///
/// ```
/// use limb_control::{AnalyticConfig, AnalyticReacher};
/// use roadmap_types::{MilestoneId, Route, Waypoint};
/// use nalgebra::Point2;
///
/// let route = Route::new(vec![
///     Waypoint::new(MilestoneId::new(0), Point2::new(0.0, 0.0)),
///     Waypoint::new(MilestoneId::new(1), Point2::new(12.0, 5.0)),
///     Waypoint::new(MilestoneId::new(2), Point2::new(20.0, 0.0)),
/// ]);
///
/// let mut reacher = AnalyticReacher::new([10.0, 8.0], [0.0, 0.5], AnalyticConfig::default()).unwrap();
/// reacher.spawn(route).unwrap();
/// for _ in 0..10_000 {
///     if reacher.update(0.01) {
///         break;
///     }
/// }
/// assert!(reacher.is_finished());
/// assert!((reacher.limb().pivot() - Point2::new(20.0, 0.0)).norm() < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct AnalyticReacher {
    limb: LimbChain,
    spawn_lengths: [f64; 2],
    spawn_angles: [f64; 2],
    route: Route,
    next: usize,
    target: Option<[f64; 2]>,
    config: AnalyticConfig,
}

impl AnalyticReacher {
    /// Creates a reacher with the given link lengths and spawn angles.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration or a non-positive length.
    pub fn new(
        lengths: [f64; 2],
        angles: [f64; 2],
        config: AnalyticConfig,
    ) -> Result<Self, LimbError> {
        config.validate()?;
        let limb = LimbChain::spawned(Point2::origin(), &lengths, &angles, LimbConfig::default())?;
        Ok(Self {
            limb,
            spawn_lengths: lengths,
            spawn_angles: angles,
            route: Route::default(),
            next: 0,
            target: None,
            config,
        })
    }

    /// Spawns the limb on the first waypoint and solves for the second.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::NoActiveRoute`] for an empty route and
    /// [`LimbError::Ik`] if the second waypoint is out of reach.
    pub fn spawn(&mut self, route: Route) -> Result<(), LimbError> {
        let start = route.start().ok_or(LimbError::NoActiveRoute)?.position;
        let target = match route.get(1) {
            Some(waypoint) => Some(self.solve_from(start, waypoint)?),
            None => None,
        };
        self.limb
            .spawn(start, &self.spawn_lengths, &self.spawn_angles)?;
        self.route = route;
        self.next = 1;
        self.target = target;
        Ok(())
    }

    fn solve_from(&self, pivot: Point2<f64>, waypoint: &Waypoint) -> Result<[f64; 2], LimbError> {
        let lengths = [self.limb.lengths()[0], self.limb.lengths()[1]];
        let (q1, q2) = solve_analytic(pivot, lengths, waypoint.position)?;
        Ok([q1, q2])
    }

    /// Advances the joints by one timestep. Returns `true` once the route is finished.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.is_finished() {
            return true;
        }
        let Some(target) = self.target else {
            return false;
        };

        let gap = self
            .limb
            .angles()
            .iter()
            .zip(target)
            .map(|(angle, goal)| wrap_angle(goal - angle).powi(2))
            .sum::<f64>()
            .sqrt();
        if gap < self.config.joint_slack() {
            self.advance();
            return self.is_finished();
        }
        if !dt.is_finite() || dt <= 0.0 {
            return false;
        }

        let min_speed = self.config.min_joint_speed();
        for (angle, goal) in self.limb.angles_mut().iter_mut().zip(target) {
            let diff = wrap_angle(goal - *angle);
            let step = diff.signum() * diff.abs().max(min_speed) * dt;
            *angle = if step.abs() > diff.abs() {
                goal
            } else {
                wrap_angle(*angle + step)
            };
        }
        false
    }

    fn advance(&mut self) {
        self.limb.switch_pivot();
        self.next += 1;
        debug!(reached = self.next - 1, "Reached waypoint");

        self.target = match self.route.get(self.next).copied() {
            Some(waypoint) => match self.solve_from(self.limb.pivot(), &waypoint) {
                Ok(target) => Some(target),
                Err(error) => {
                    warn!(%error, waypoint = %waypoint.id, "Waypoint out of reach, stalling");
                    None
                }
            },
            None => None,
        };
    }

    /// Returns `true` when no waypoint is left to reach.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next >= self.route.len()
    }

    /// Returns `true` if the walker has a waypoint ahead it cannot reach.
    #[must_use]
    pub fn is_stalled(&self) -> bool {
        !self.is_finished() && self.target.is_none()
    }

    /// Returns the target joint pair for the current waypoint.
    #[must_use]
    pub const fn target_angles(&self) -> Option<[f64; 2]> {
        self.target
    }

    /// Returns the route being followed.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the limb.
    #[must_use]
    pub const fn limb(&self) -> &LimbChain {
        &self.limb
    }
}
