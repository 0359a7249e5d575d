#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wumpus_core::Coord;

/// Planned path from an (excluded) start cell to an (included) goal cell.
///
/// Consecutive steps are grid-adjacent, and the first step is adjacent to the start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    pub steps: Vec<Coord>,
    /// Total move and turn cost when the route was planned.
    pub cost: u32,
}

impl Route {
    pub fn new(steps: Vec<Coord>, cost: u32) -> Self {
        Self { steps, cost }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn goal(&self) -> Option<Coord> {
        self.steps.last().copied()
    }

    /// The cell to enter next.
    pub fn next(&self) -> Option<Coord> {
        self.steps.first().copied()
    }

    /// Remove and return the next cell. `cost` is left untouched.
    pub fn advance(&mut self) -> Option<Coord> {
        if self.steps.is_empty() {
            return None;
        }
        Some(self.steps.remove(0))
    }
}
