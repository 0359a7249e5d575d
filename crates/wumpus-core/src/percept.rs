#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Signals sensed at the agent's current cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Percepts {
    pub stench: bool,
    pub breeze: bool,
    pub glitter: bool,
}

impl Percepts {
    pub fn none() -> Self {
        Self::default()
    }

    /// True when a neighboring cell may hold a pit or a wumpus.
    pub fn any_hazard(&self) -> bool {
        self.stench || self.breeze
    }
}
