//! Configuration types for roadmap growth and search.
//!
//! # Example
//!
//! ```
//! use roadmap_types::{EdgeBand, GrowConfig, SamplingArea, SearchStrategy};
//! use nalgebra::Point2;
//!
//! let area = SamplingArea::new(Point2::new(-100.0, -100.0), Point2::new(100.0, 100.0)).unwrap();
//! let band = EdgeBand::new(0.0, 15.0).unwrap();
//!
//! let config = GrowConfig::new(area, band).with_margin(2.0);
//! assert!(config.validate().is_ok());
//!
//! let strategy = SearchStrategy::weighted_a_star(1.5).unwrap();
//! assert_eq!(strategy.name(), "Weighted A*");
//! ```

use nalgebra::Point2;
use planar_space::geometry::is_finite_point;

use crate::error::RoadmapError;

/// Admissible edge lengths `[min, max]` between connected milestones.
///
/// # Example
///
/// ```
/// use roadmap_types::EdgeBand;
///
/// let band = EdgeBand::new(2.0, 10.0).unwrap();
/// assert!(band.contains(2.0));
/// assert!(band.contains(10.0));
/// assert!(!band.contains(10.5));
///
/// assert!(EdgeBand::new(5.0, 1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeBand {
    min: f64,
    max: f64,
}

impl EdgeBand {
    /// Creates a band, requiring finite `0 <= min <= max`.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEdgeBand`] otherwise.
    pub fn new(min: f64, max: f64) -> Result<Self, RoadmapError> {
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(RoadmapError::InvalidEdgeBand { min, max });
        }
        Ok(Self { min, max })
    }

    /// Creates a band `[0, max]`.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEdgeBand`] if `max` is negative or not finite.
    pub fn up_to(max: f64) -> Result<Self, RoadmapError> {
        Self::new(0.0, max)
    }

    /// Returns the minimum edge length.
    #[must_use]
    pub const fn min(&self) -> f64 {
        self.min
    }

    /// Returns the maximum edge length.
    #[must_use]
    pub const fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` if `distance` lies in the closed band.
    #[must_use]
    pub fn contains(&self, distance: f64) -> bool {
        (self.min..=self.max).contains(&distance)
    }
}

/// Axis-aligned rectangle that milestones are sampled from.
///
/// Corners are reordered on construction so `min_corner <= max_corner`
/// componentwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SamplingArea {
    min_corner: Point2<f64>,
    max_corner: Point2<f64>,
}

impl SamplingArea {
    /// Creates the rectangle spanned by two opposite corners.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidSamplingArea`] if a corner is not finite
    /// or the extent along either axis overflows.
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_types::SamplingArea;
    /// use nalgebra::Point2;
    ///
    /// let area = SamplingArea::new(Point2::new(5.0, -1.0), Point2::new(-5.0, 1.0)).unwrap();
    /// assert_eq!(area.min_corner(), Point2::new(-5.0, -1.0));
    /// assert_eq!(area.max_corner(), Point2::new(5.0, 1.0));
    /// ```
    pub fn new(a: Point2<f64>, b: Point2<f64>) -> Result<Self, RoadmapError> {
        let area = Self {
            min_corner: a.inf(&b),
            max_corner: a.sup(&b),
        };
        area.validate()?;
        Ok(area)
    }

    /// Checks that both corners and both extents are finite.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidSamplingArea`] otherwise.
    pub fn validate(&self) -> Result<(), RoadmapError> {
        let finite = is_finite_point(&self.min_corner)
            && is_finite_point(&self.max_corner)
            && self.width().is_finite()
            && self.height().is_finite();
        if finite {
            Ok(())
        } else {
            Err(RoadmapError::InvalidSamplingArea)
        }
    }

    /// Returns the componentwise minimum corner.
    #[must_use]
    pub const fn min_corner(&self) -> Point2<f64> {
        self.min_corner
    }

    /// Returns the componentwise maximum corner.
    #[must_use]
    pub const fn max_corner(&self) -> Point2<f64> {
        self.max_corner
    }

    /// Returns the extent along X.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_corner.x - self.min_corner.x
    }

    /// Returns the extent along Y.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_corner.y - self.min_corner.y
    }

    /// Returns `true` if `point` lies in the closed rectangle.
    #[must_use]
    pub fn contains(&self, point: Point2<f64>) -> bool {
        (self.min_corner.x..=self.max_corner.x).contains(&point.x)
            && (self.min_corner.y..=self.max_corner.y).contains(&point.y)
    }
}

/// Configuration for growing a roadmap.
///
/// Defaults:
/// - Margin: 0 (samples may touch obstacles' boundaries)
/// - Max attempts per sample: 10,000
/// - Slippery probability: 0
///
/// # Example
///
/// ```
/// use roadmap_types::{EdgeBand, GrowConfig, SamplingArea};
/// use nalgebra::Point2;
///
/// let config = GrowConfig::new(
///     SamplingArea::new(Point2::new(0.0, 0.0), Point2::new(50.0, 50.0)).unwrap(),
///     EdgeBand::new(1.0, 8.0).unwrap(),
/// )
/// .with_margin(0.5)
/// .with_slippery_probability(0.1);
///
/// assert_eq!(config.max_attempts_per_sample(), 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GrowConfig {
    /// Sampling rectangle.
    area: SamplingArea,
    /// Admissible edge lengths.
    band: EdgeBand,
    /// Samples closer than this to an obstacle are rejected.
    margin: f64,
    /// Rejected samples tolerated before giving up on one milestone.
    max_attempts_per_sample: usize,
    /// Probability that a new milestone is flagged slippery.
    slippery_probability: f64,
}

impl GrowConfig {
    /// Creates a configuration with default margin and limits.
    #[must_use]
    pub const fn new(area: SamplingArea, band: EdgeBand) -> Self {
        Self {
            area,
            band,
            margin: 0.0,
            max_attempts_per_sample: 10_000,
            slippery_probability: 0.0,
        }
    }

    /// Sets the sampling area.
    #[must_use]
    pub const fn with_area(mut self, area: SamplingArea) -> Self {
        self.area = area;
        self
    }

    /// Sets the edge band.
    #[must_use]
    pub const fn with_band(mut self, band: EdgeBand) -> Self {
        self.band = band;
        self
    }

    /// Sets the obstacle clearance margin for samples.
    #[must_use]
    pub const fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the rejection sampling limit per milestone.
    #[must_use]
    pub const fn with_max_attempts_per_sample(mut self, attempts: usize) -> Self {
        self.max_attempts_per_sample = attempts;
        self
    }

    /// Sets the probability (0-1) of marking a new milestone slippery.
    #[must_use]
    pub const fn with_slippery_probability(mut self, probability: f64) -> Self {
        self.slippery_probability = probability;
        self
    }

    /// Returns the sampling area.
    #[must_use]
    pub const fn area(&self) -> &SamplingArea {
        &self.area
    }

    /// Returns the edge band.
    #[must_use]
    pub const fn band(&self) -> &EdgeBand {
        &self.band
    }

    /// Returns the sample clearance margin.
    #[must_use]
    pub const fn margin(&self) -> f64 {
        self.margin
    }

    /// Returns the rejection sampling limit per milestone.
    #[must_use]
    pub const fn max_attempts_per_sample(&self) -> usize {
        self.max_attempts_per_sample
    }

    /// Returns the slippery probability.
    #[must_use]
    pub const fn slippery_probability(&self) -> f64 {
        self.slippery_probability
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidMargin`] for a negative or non-finite margin
    /// and [`RoadmapError::InvalidConfig`] for a zero attempt limit or a
    /// probability outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), RoadmapError> {
        self.area.validate()?;
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(RoadmapError::InvalidMargin(self.margin));
        }
        if self.max_attempts_per_sample == 0 {
            return Err(RoadmapError::invalid_config(
                "max_attempts_per_sample must be positive",
            ));
        }
        if !(0.0..=1.0).contains(&self.slippery_probability) {
            return Err(RoadmapError::invalid_config(format!(
                "slippery_probability must lie in [0, 1], got {}",
                self.slippery_probability
            )));
        }
        Ok(())
    }
}

/// Graph search strategies over a roadmap.
///
/// Strategies differ only in the order the fringe hands back milestones:
///
/// | Strategy | Fringe | Priority |
/// |----------|--------|----------|
/// | [`DepthFirst`](Self::DepthFirst) | stack | - |
/// | [`BreadthFirst`](Self::BreadthFirst) | queue | - |
/// | [`UniformCost`](Self::UniformCost) | priority queue | `g` |
/// | [`AStar`](Self::AStar) | priority queue | `g + h` |
/// | [`WeightedAStar`](Self::WeightedAStar) | priority queue | `g + ε·h` |
///
/// `g` is the distance travelled from the start and `h` the straight-line
/// distance to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStrategy {
    /// Last-in first-out.
    DepthFirst,
    /// First-in first-out.
    BreadthFirst,
    /// Dijkstra order.
    UniformCost,
    /// Euclidean-heuristic A*.
    #[default]
    AStar,
    /// A* with the heuristic inflated by `epsilon >= 1`.
    WeightedAStar {
        /// Heuristic inflation factor.
        epsilon: f64,
    },
}

impl SearchStrategy {
    /// Creates a weighted A* strategy.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEpsilon`] unless `epsilon` is finite and `>= 1`.
    pub fn weighted_a_star(epsilon: f64) -> Result<Self, RoadmapError> {
        let strategy = Self::WeightedAStar { epsilon };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Returns a short display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DepthFirst => "DFS",
            Self::BreadthFirst => "BFS",
            Self::UniformCost => "UCS",
            Self::AStar => "A*",
            Self::WeightedAStar { .. } => "Weighted A*",
        }
    }

    /// Returns `true` for strategies backed by a priority queue.
    #[must_use]
    pub const fn is_prioritized(&self) -> bool {
        !matches!(self, Self::DepthFirst | Self::BreadthFirst)
    }

    /// Returns the fringe priority for a milestone, lower first.
    ///
    /// `None` for the unordered strategies.
    ///
    /// # Example
    ///
    /// ```
    /// use roadmap_types::SearchStrategy;
    ///
    /// assert_eq!(SearchStrategy::UniformCost.priority(3.0, 4.0), Some(3.0));
    /// assert_eq!(SearchStrategy::AStar.priority(3.0, 4.0), Some(7.0));
    /// assert_eq!(SearchStrategy::WeightedAStar { epsilon: 2.0 }.priority(3.0, 4.0), Some(11.0));
    /// assert_eq!(SearchStrategy::DepthFirst.priority(3.0, 4.0), None);
    /// ```
    #[must_use]
    pub fn priority(&self, distance: f64, heuristic: f64) -> Option<f64> {
        match self {
            Self::DepthFirst | Self::BreadthFirst => None,
            Self::UniformCost => Some(distance),
            Self::AStar => Some(distance + heuristic),
            Self::WeightedAStar { epsilon } => Some(epsilon.mul_add(heuristic, distance)),
        }
    }

    /// Validates strategy parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RoadmapError::InvalidEpsilon`] for a weighted A* factor that is
    /// not finite or below one.
    pub fn validate(&self) -> Result<(), RoadmapError> {
        match *self {
            Self::WeightedAStar { epsilon } if !epsilon.is_finite() || epsilon < 1.0 => {
                Err(RoadmapError::InvalidEpsilon(epsilon))
            }
            _ => Ok(()),
        }
    }
}
