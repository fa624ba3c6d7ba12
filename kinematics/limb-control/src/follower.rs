//! Walking a roadmap route with a single pivot-switching limb.

use nalgebra::Point2;
use roadmap_types::{MilestoneId, Route, Waypoint};
use tracing::{debug, info};

use crate::config::FollowerConfig;
use crate::error::LimbError;
use crate::limb::LimbChain;

/// Drives a [`LimbChain`] along a [`Route`], one waypoint per pivot switch.
///
/// The limb is spawned on the route's first waypoint and reaches for the
/// next one. When the free end arrives, the limb switches pivot onto it and
/// targets the following waypoint. The speed floor is re-captured from the
/// first IK step after every goal change, so long strides and short strides
/// both keep their initial pace.
///
/// # Example
///
/// ```
/// use limb_control::{FollowerConfig, LimbConfig, RouteFollower};
/// use roadmap_types::{MilestoneId, Route, Waypoint};
/// use nalgebra::Point2;
///
/// let route = Route::new(vec![
///     Waypoint::new(MilestoneId::new(0), Point2::new(0.0, 0.0)),
///     Waypoint::new(MilestoneId::new(1), Point2::new(8.0, 0.0)),
///     Waypoint::new(MilestoneId::new(2), Point2::new(16.0, 0.0)),
/// ]);
///
/// let config = FollowerConfig::default().with_limb(LimbConfig::default().with_seed(3));
/// let mut follower = RouteFollower::new(vec![4.0, 4.0, 4.0], vec![0.6, -0.6, -0.6], config).unwrap();
/// follower.spawn(route).unwrap();
///
/// let mut steps = 0;
/// while !follower.update(1e-4) && steps < 200_000 {
///     steps += 1;
/// }
/// assert!(follower.is_finished());
/// assert!((follower.limb().pivot() - Point2::new(16.0, 0.0)).norm() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct RouteFollower {
    limb: LimbChain,
    spawn_lengths: Vec<f64>,
    spawn_angles: Vec<f64>,
    route: Route,
    next: usize,
    min_speed: f64,
    capture_min_speed: bool,
    config: FollowerConfig,
}

impl RouteFollower {
    /// Creates a follower whose limb has the given lengths and spawn angles.
    ///
    /// The follower has no route until [`spawn`](Self::spawn) is called.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid configuration, mismatched slices or a
    /// non-positive link length.
    pub fn new(
        lengths: Vec<f64>,
        angles: Vec<f64>,
        config: FollowerConfig,
    ) -> Result<Self, LimbError> {
        config.validate()?;
        let limb = LimbChain::spawned(Point2::origin(), &lengths, &angles, *config.limb())?;
        Ok(Self {
            limb,
            spawn_lengths: lengths,
            spawn_angles: angles,
            route: Route::default(),
            next: 0,
            min_speed: config.initial_min_speed(),
            capture_min_speed: false,
            config,
        })
    }

    /// Spawns the limb on the first waypoint of `route` and starts following it.
    ///
    /// A start-only route (unreachable goal) spawns the limb and leaves the
    /// follower finished.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::NoActiveRoute`] for an empty route.
    pub fn spawn(&mut self, route: Route) -> Result<(), LimbError> {
        let start = route.start().ok_or(LimbError::NoActiveRoute)?.position;
        self.limb
            .spawn(start, &self.spawn_lengths, &self.spawn_angles)?;
        info!(
            waypoints = route.len(),
            length = route.length(),
            "Following new route"
        );
        self.set_route(route);
        Ok(())
    }

    /// Replaces the route without moving the limb.
    ///
    /// The limb keeps its pose and reaches for the new route's second
    /// waypoint; the first is expected to sit at the limb's pivot. Here and
    /// after every pivot switch, waypoints within the reach slack of the
    /// pivot count as already reached.
    pub fn set_route(&mut self, route: Route) {
        self.route = route;
        self.next = 1;
        self.min_speed = self.config.initial_min_speed();
        self.retarget();
    }

    /// Advances the limb by one timestep. Returns `true` once the route is finished.
    pub fn update(&mut self, dt: f64) -> bool {
        if self.is_finished() {
            return true;
        }

        if self.capture_min_speed && dt > 0.0 {
            let norm = self.limb.ik_delta(dt).norm();
            if norm > 0.0 {
                self.min_speed = norm;
            }
            self.capture_min_speed = false;
        }

        if self.limb.update(dt, self.min_speed) {
            self.limb.switch_pivot();
            self.next += 1;
            debug!(
                reached = self.next - 1,
                remaining = self.route.len().saturating_sub(self.next),
                "Reached waypoint"
            );
            self.retarget();
        }
        self.is_finished()
    }

    fn retarget(&mut self) {
        let pivot = self.limb.pivot();
        let slack = self.config.limb().reach_slack();
        while self
            .route
            .get(self.next)
            .is_some_and(|w| (w.position - pivot).norm() < slack)
        {
            self.next += 1;
        }
        if let Some(target) = self.route.get(self.next) {
            self.limb.set_goal(target.position);
            self.capture_min_speed = true;
        }
    }

    /// Returns the waypoint the limb is reaching for.
    #[must_use]
    pub fn current_target(&self) -> Option<&Waypoint> {
        self.route.get(self.next)
    }

    /// Returns the ids of the waypoint the limb stands on and the one it reaches for.
    #[must_use]
    pub fn current_segment(&self) -> Option<(MilestoneId, MilestoneId)> {
        let from = self.route.get(self.next.checked_sub(1)?)?;
        let to = self.route.get(self.next)?;
        Some((from.id, to.id))
    }

    /// Returns `true` when no waypoint is left to reach.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.next >= self.route.len()
    }

    /// Returns `true` if the follower has walked a reachable route to its end.
    #[must_use]
    pub fn reached_goal(&self) -> bool {
        self.is_finished() && !self.route.is_unreachable()
    }

    /// Returns the route being followed.
    #[must_use]
    pub const fn route(&self) -> &Route {
        &self.route
    }

    /// Returns the index of the waypoint being reached for.
    #[must_use]
    pub const fn next_index(&self) -> usize {
        self.next
    }

    /// Returns the current speed floor.
    #[must_use]
    pub const fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// Returns the limb.
    #[must_use]
    pub const fn limb(&self) -> &LimbChain {
        &self.limb
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &FollowerConfig {
        &self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::config::LimbConfig;

    fn line_route(xs: &[f64]) -> Route {
        Route::new(
            xs.iter()
                .enumerate()
                .map(|(i, &x)| Waypoint::new(MilestoneId::new(i), Point2::new(x, 0.0)))
                .collect(),
        )
    }

    fn follower() -> RouteFollower {
        let config = FollowerConfig::default().with_limb(LimbConfig::default().with_seed(9));
        RouteFollower::new(vec![4.0, 4.0, 4.0], vec![0.6, -0.6, -0.6], config).unwrap()
    }

    #[test]
    fn test_new_follower_is_idle() {
        let follower = follower();
        assert!(follower.is_finished());
        assert!(follower.current_segment().is_none());
        assert!(follower.current_target().is_none());
    }

    #[test]
    fn test_spawn_targets_second_waypoint() {
        let mut follower = follower();
        follower.spawn(line_route(&[2.0, 10.0, 18.0])).unwrap();

        assert_eq!(follower.limb().pivot(), Point2::new(2.0, 0.0));
        assert_eq!(follower.limb().goal(), Point2::new(10.0, 0.0));
        assert_eq!(
            follower.current_segment(),
            Some((MilestoneId::new(0), MilestoneId::new(1)))
        );
        assert!(!follower.is_finished());
    }

    #[test]
    fn test_spawn_rejects_empty_route() {
        let mut follower = follower();
        assert!(matches!(
            follower.spawn(Route::default()),
            Err(LimbError::NoActiveRoute)
        ));
    }

    #[test]
    fn test_unreachable_route_finishes_immediately() {
        let mut follower = follower();
        follower.spawn(line_route(&[5.0])).unwrap();
        assert!(follower.is_finished());
        assert!(!follower.reached_goal());
        assert!(follower.update(0.01));
    }

    #[test]
    fn test_min_speed_captured_on_first_step() {
        let mut follower = follower();
        follower.spawn(line_route(&[0.0, 8.0])).unwrap();
        let expected = follower.limb().ik_delta(0.001).norm();

        follower.update(0.001);
        assert!((follower.min_speed() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_walks_route_with_pivot_switches() {
        let mut follower = follower();
        follower.spawn(line_route(&[0.0, 8.0, 16.0, 24.0])).unwrap();

        let mut switches = 0;
        let mut last_next = follower.next_index();
        for _ in 0..200_000 {
            if follower.update(1e-4) {
                break;
            }
            if follower.next_index() != last_next {
                switches += 1;
                last_next = follower.next_index();
            }
        }

        assert!(follower.reached_goal());
        assert_eq!(switches, 2);
        assert!((follower.limb().pivot() - Point2::new(24.0, 0.0)).norm() < 1.0);
        // Three switches in total leave the limb reversed
        assert!(!follower.limb().is_forward_oriented());
    }

    #[test]
    fn test_set_route_keeps_pose() {
        let mut follower = follower();
        follower.spawn(line_route(&[0.0, 8.0])).unwrap();
        let angles = follower.limb().angles().clone();

        // The second waypoint sits under the pivot and is skipped
        follower.set_route(line_route(&[0.0, 0.5, -8.0]));
        assert_eq!(follower.limb().angles(), &angles);
        assert_eq!(follower.limb().goal(), Point2::new(-8.0, 0.0));
        assert_eq!(follower.next_index(), 2);
    }
}
