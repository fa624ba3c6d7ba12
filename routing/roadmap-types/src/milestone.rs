//! Milestone identity and per-search marks.

use std::fmt;

/// Identifier of a milestone within one roadmap.
///
/// An id is a slot index plus the generation of that slot. Removing a
/// milestone frees its slot for a later insertion under a new generation,
/// so an id held across a removal never aliases the newcomer.
///
/// # Example
///
/// ```
/// use roadmap_types::MilestoneId;
///
/// let id = MilestoneId::new(3);
/// assert_eq!(id.index(), 3);
/// assert_eq!(id.to_string(), "m3");
///
/// let reused = id.with_generation(2);
/// assert_ne!(id, reused);
/// assert_eq!(reused.to_string(), "m3#2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MilestoneId {
    index: usize,
    generation: u32,
}

impl MilestoneId {
    /// Wraps a raw index at generation zero.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            generation: 0,
        }
    }

    /// Returns the same slot tagged with `generation`.
    #[must_use]
    pub const fn with_generation(self, generation: u32) -> Self {
        Self {
            index: self.index,
            generation,
        }
    }

    /// Returns the raw slot index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Returns how many times the slot had been freed when this id was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for MilestoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "m{}", self.index)
        } else {
            write!(f, "m{}#{}", self.index, self.generation)
        }
    }
}

impl From<usize> for MilestoneId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

/// How the most recent search treated a milestone.
///
/// Renderers use this as a colour tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchMark {
    /// Never reached by the last search.
    #[default]
    Unvisited,
    /// Pushed onto the fringe but not expanded.
    Fringe,
    /// Popped and expanded.
    Explored,
}

impl SearchMark {
    /// Returns `true` if the milestone was expanded.
    #[must_use]
    pub const fn is_explored(self) -> bool {
        matches!(self, Self::Explored)
    }
}
