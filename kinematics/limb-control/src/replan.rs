//! Invalidating roadmap pieces and re-searching when a walk goes wrong.
//!
//! Two events trigger a replan:
//!
//! - **Collision**: the limb crosses an obstacle (or an inner joint comes
//!   within the joint margin of one). Both milestones of the current segment
//!   are removed, since the edge between them evidently is not safe to walk.
//! - **Slippery target**: the waypoint being reached for is flagged slippery.
//!   Only that milestone is removed.
//!
//! The new route is searched from the limb's pivot to the old route's final
//! waypoint and handed to the follower without respawning the limb.
//!
//! The limb usually still overlaps the obstacle right after a collision
//! replan. Further collision replans are held back until the limb switches
//! pivot or stops intersecting; slippery targets are still handled meanwhile.

use nalgebra::Point2;
use planar_space::ConfigurationSpace;
use roadmap_search::Roadmap;
use roadmap_types::MilestoneId;
use tracing::{debug, info, warn};

use crate::config::ReplanConfig;
use crate::error::LimbError;
use crate::follower::RouteFollower;

/// What prompted a replan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanReason {
    /// The limb intersects the configuration space.
    Collision,
    /// The current target milestone is slippery.
    Slippery,
}

/// Result of a [`Replanner::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplanOutcome {
    /// Nothing needed replanning.
    Clear,
    /// The limb still intersects after a collision replan from the same pivot.
    InProgress,
    /// A new route was found and handed to the follower.
    Replanned {
        /// Why the old route was abandoned.
        reason: ReplanReason,
        /// Milestones removed from the roadmap.
        removed: usize,
        /// Waypoints on the new route.
        waypoints: usize,
    },
    /// The goal is no longer reachable; the follower now holds a start-only route.
    Unreachable {
        /// Why the old route was abandoned.
        reason: ReplanReason,
        /// Milestones removed from the roadmap.
        removed: usize,
    },
}

impl ReplanOutcome {
    /// Returns `true` if the follower's route was replaced.
    #[must_use]
    pub const fn changed_route(&self) -> bool {
        matches!(self, Self::Replanned { .. } | Self::Unreachable { .. })
    }
}

/// Watches a [`RouteFollower`] and replans around collisions and slippery milestones.
///
/// A replanner remembers the pivot of its last collision replan, so use one
/// per follower and call [`check`](Self::check) every step.
///
/// # Example
///
/// ```
/// use limb_control::{FollowerConfig, LimbConfig, ReplanConfig, ReplanOutcome, Replanner, RouteFollower};
/// use nalgebra::Point2;
/// use planar_space::ConfigurationSpace;
/// use roadmap_search::Roadmap;
/// use roadmap_types::EdgeBand;
///
/// let band = EdgeBand::new(0.0, 9.0).unwrap();
/// let space = ConfigurationSpace::empty();
/// let mut roadmap = Roadmap::with_seed(0);
/// for x in [8.0, 16.0] {
///     roadmap.add_milestone(Point2::new(x, 0.0), band, space);
/// }
/// let route = roadmap.a_star(Point2::new(0.0, 0.0), Point2::new(24.0, 0.0), band, space);
///
/// let config = FollowerConfig::default().with_limb(LimbConfig::default().with_seed(1));
/// let mut follower = RouteFollower::new(vec![4.0, 4.0, 4.0], vec![0.6, -0.6, -0.6], config).unwrap();
/// follower.spawn(route).unwrap();
///
/// let mut replanner = Replanner::new(ReplanConfig::new(band)).unwrap();
/// let outcome = replanner.check(&mut roadmap, &mut follower, space).unwrap();
/// assert_eq!(outcome, ReplanOutcome::Clear);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Replanner {
    config: ReplanConfig,
    /// Pivot the last collision replan was issued from.
    pending: Option<Point2<f64>>,
}

impl Replanner {
    /// Creates a replanner.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: ReplanConfig) -> Result<Self, LimbError> {
        config.validate()?;
        Ok(Self {
            config,
            pending: None,
        })
    }

    /// Returns `true` while collision replans are held back.
    #[must_use]
    pub const fn is_path_change_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ReplanConfig {
        &self.config
    }

    /// Checks the follower against `space` and `roadmap`, replanning if needed.
    ///
    /// A finished follower is always [`ReplanOutcome::Clear`]. A limb that
    /// still intersects from the pivot of the previous collision replan
    /// yields [`ReplanOutcome::InProgress`] unless its target is slippery.
    ///
    /// # Errors
    ///
    /// Returns [`LimbError::NoActiveRoute`] if the follower was never given a
    /// route and [`LimbError::Planning`] if the search fails.
    pub fn check(
        &mut self,
        roadmap: &mut Roadmap,
        follower: &mut RouteFollower,
        space: ConfigurationSpace<'_>,
    ) -> Result<ReplanOutcome, LimbError> {
        let goal = follower
            .route()
            .goal()
            .ok_or(LimbError::NoActiveRoute)?
            .position;
        let Some((from, to)) = follower.current_segment() else {
            self.pending = None;
            return Ok(ReplanOutcome::Clear);
        };

        let start = follower.limb().pivot();
        let colliding = follower.limb().intersects(space, self.config.joint_margin());
        if self.pending.is_some_and(|pivot| !colliding || pivot != start) {
            debug!(colliding, "Path change settled");
            self.pending = None;
        }

        let (reason, invalid): (ReplanReason, Vec<MilestoneId>) =
            if colliding && self.pending.is_none() {
                (ReplanReason::Collision, vec![from, to])
            } else if roadmap.milestone(to).is_some_and(|m| m.is_slippery()) {
                (ReplanReason::Slippery, vec![to])
            } else if colliding {
                return Ok(ReplanOutcome::InProgress);
            } else {
                return Ok(ReplanOutcome::Clear);
            };

        let removed = roadmap.remove_milestones(invalid);
        if reason == ReplanReason::Collision {
            self.pending = Some(start);
        }
        let route = roadmap.search(
            self.config.strategy(),
            start,
            goal,
            self.config.band(),
            space,
        )?;

        if route.is_unreachable() {
            warn!(?reason, removed, "Replan found no route to goal");
            follower.set_route(route);
            return Ok(ReplanOutcome::Unreachable { reason, removed });
        }

        let waypoints = route.len();
        info!(?reason, removed, waypoints, length = route.length(), "Replanned route");
        follower.set_route(route);
        Ok(ReplanOutcome::Replanned {
            reason,
            removed,
            waypoints,
        })
    }
}
