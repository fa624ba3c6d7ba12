//! Probabilistic roadmap construction and editing.
//!
//! A [`Roadmap`] is grown by rejection sampling: each sample that keeps
//! `margin` clearance from every obstacle becomes a milestone and is
//! connected to every earlier milestone within the edge band whose
//! connecting segment is collision-free. Growth is quadratic in the number
//! of milestones.
//!
//! # Example
//!
//! ```
//! use roadmap_search::Roadmap;
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea};
//! use planar_space::{ConfigurationSpace, Obstacle};
//! use nalgebra::Point2;
//!
//! let obstacles = vec![Obstacle::circle(Point2::new(0.0, 0.0), 10.0).unwrap()];
//! let space = ConfigurationSpace::new(&obstacles);
//!
//! let config = GrowConfig::new(
//!     SamplingArea::new(Point2::new(-50.0, -50.0), Point2::new(50.0, 50.0)).unwrap(),
//!     EdgeBand::new(0.0, 20.0).unwrap(),
//! )
//! .with_margin(1.0);
//!
//! let mut roadmap = Roadmap::with_seed(7);
//! let edges = roadmap.grow(200, &config, space).unwrap();
//!
//! assert_eq!(roadmap.len(), 200);
//! assert_eq!(roadmap.edge_count(), edges);
//! assert!(roadmap.milestones().all(|m| !space.intersects_point(m.position(), 1.0)));
//! ```

use nalgebra::Point2;
use planar_space::ConfigurationSpace;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roadmap_types::{EdgeBand, GrowConfig, MilestoneId, RoadmapError};
use tracing::{debug, info};

use crate::milestone::Milestone;

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    milestone: Option<Milestone>,
}

/// A graph of collision-free milestones.
///
/// Removed slots go on a free list and are refilled by later insertions
/// under a bumped generation, so the slot table stays as large as the peak
/// live count rather than the total ever inserted.
#[derive(Debug, Clone)]
pub struct Roadmap {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
    edge_count: usize,
    rng: StdRng,
}

impl Roadmap {
    /// Creates an empty roadmap sampling from OS entropy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates an empty roadmap with a reproducible sampler.
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_search::Roadmap;
    /// use roadmap_types::{EdgeBand, GrowConfig, SamplingArea};
    /// use planar_space::ConfigurationSpace;
    /// use nalgebra::Point2;
    ///
    /// let config = GrowConfig::new(
    ///     SamplingArea::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)).unwrap(),
    ///     EdgeBand::up_to(3.0).unwrap(),
    /// );
    /// let mut a = Roadmap::with_seed(1);
    /// let mut b = Roadmap::with_seed(1);
    /// a.grow(20, &config, ConfigurationSpace::empty()).unwrap();
    /// b.grow(20, &config, ConfigurationSpace::empty()).unwrap();
    /// assert!(a.milestones().zip(b.milestones()).all(|(x, y)| x.position() == y.position()));
    /// ```
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    const fn with_rng(rng: StdRng) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            live: 0,
            edge_count: 0,
            rng,
        }
    }

    /// Samples `count` free milestones and connects them.
    ///
    /// Returns the total number of edges in the roadmap afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation, or
    /// [`RoadmapError::SamplingExhausted`] if no free sample is found within
    /// `config.max_attempts_per_sample()` draws. Milestones added before the
    /// failure are kept.
    pub fn grow(
        &mut self,
        count: usize,
        config: &GrowConfig,
        space: ConfigurationSpace<'_>,
    ) -> Result<usize, RoadmapError> {
        config.validate()?;
        let before = self.live;

        for _ in 0..count {
            let position = self.sample_free(config, space)?;
            let id = self.add_milestone(position, *config.band(), space);
            if config.slippery_probability() > 0.0
                && self.rng.gen_bool(config.slippery_probability())
            {
                if let Some(milestone) = self.slot_mut(id) {
                    milestone.set_slippery(true);
                }
            }
        }

        info!(
            added = self.live - before,
            milestones = self.live,
            edges = self.edge_count,
            "Roadmap growth complete"
        );
        Ok(self.edge_count)
    }

    fn sample_free(
        &mut self,
        config: &GrowConfig,
        space: ConfigurationSpace<'_>,
    ) -> Result<Point2<f64>, RoadmapError> {
        let area = config.area();
        let (lo, hi) = (area.min_corner(), area.max_corner());
        for _ in 0..config.max_attempts_per_sample() {
            let candidate = Point2::new(
                self.rng.gen_range(lo.x..=hi.x),
                self.rng.gen_range(lo.y..=hi.y),
            );
            if !space.intersects_point(candidate, config.margin()) {
                return Ok(candidate);
            }
        }
        Err(RoadmapError::SamplingExhausted {
            attempts: config.max_attempts_per_sample(),
        })
    }

    /// Inserts a milestone at `position` and connects it to every existing
    /// milestone within `band` whose connecting segment is collision-free.
    ///
    /// The position itself is not checked against obstacles.
    pub fn add_milestone(
        &mut self,
        position: Point2<f64>,
        band: EdgeBand,
        space: ConfigurationSpace<'_>,
    ) -> MilestoneId {
        let id = match self.free.pop() {
            Some(index) => {
                MilestoneId::new(index).with_generation(self.slots[index].generation)
            }
            None => {
                self.slots.push(Slot::default());
                MilestoneId::new(self.slots.len() - 1)
            }
        };
        let mut milestone = Milestone::new(id, position);

        for other in self.slots.iter_mut().filter_map(|slot| slot.milestone.as_mut()) {
            let distance = (other.position() - position).norm();
            if band.contains(distance) && !space.intersects_segment(position, other.position()) {
                other.connect(id);
                milestone.connect(other.id());
                self.edge_count += 1;
            }
        }

        self.slots[id.index()].milestone = Some(milestone);
        self.live += 1;
        id
    }

    /// Removes milestones and every edge touching them.
    ///
    /// Unknown or already removed ids are ignored. Returns how many
    /// milestones were removed.
    pub fn remove_milestones<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = MilestoneId>,
    {
        let mut removed = 0;
        for id in ids {
            if !self.contains(id) {
                continue;
            }
            let slot = &mut self.slots[id.index()];
            let Some(mut milestone) = slot.milestone.take() else {
                continue;
            };
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(id.index());
            for neighbour in milestone.take_neighbours() {
                if let Some(other) = self.slot_mut(neighbour) {
                    if other.disconnect(id) {
                        self.edge_count -= 1;
                    }
                }
            }
            self.live -= 1;
            removed += 1;
        }
        if removed > 0 {
            debug!(
                removed,
                milestones = self.live,
                edges = self.edge_count,
                "Removed milestones"
            );
        }
        removed
    }

    /// Flags or clears a milestone as slippery.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::UnknownMilestone`] if `id` is not live.
    pub fn set_slippery(&mut self, id: MilestoneId, slippery: bool) -> Result<(), RoadmapError> {
        let milestone = self
            .slot_mut(id)
            .ok_or(RoadmapError::UnknownMilestone(id))?;
        milestone.set_slippery(slippery);
        Ok(())
    }

    /// Returns the live milestone with `id`.
    #[must_use]
    pub fn milestone(&self, id: MilestoneId) -> Option<&Milestone> {
        self.slots
            .get(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.milestone.as_ref())
    }

    pub(crate) fn slot_mut(&mut self, id: MilestoneId) -> Option<&mut Milestone> {
        self.slots
            .get_mut(id.index())
            .filter(|slot| slot.generation == id.generation())
            .and_then(|slot| slot.milestone.as_mut())
    }

    /// Iterates live milestones in slot order.
    pub fn milestones(&self) -> impl Iterator<Item = &Milestone> + '_ {
        self.slots.iter().filter_map(|slot| slot.milestone.as_ref())
    }

    pub(crate) fn milestones_mut(&mut self) -> impl Iterator<Item = &mut Milestone> + '_ {
        self.slots.iter_mut().filter_map(|slot| slot.milestone.as_mut())
    }

    /// Returns the neighbours of `id` (empty if unknown).
    pub fn neighbours(&self, id: MilestoneId) -> impl Iterator<Item = MilestoneId> + '_ {
        self.milestone(id).into_iter().flat_map(Milestone::neighbours)
    }

    /// Returns `true` if `id` refers to a live milestone.
    #[must_use]
    pub fn contains(&self, id: MilestoneId) -> bool {
        self.milestone(id).is_some()
    }

    /// Returns the number of live milestones.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Returns `true` if the roadmap has no milestones.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Returns the size of the slot table, live and free slots together.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of undirected edges.
    #[must_use]
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }
}

impl Default for Roadmap {
    fn default() -> Self {
        Self::new()
    }
}
