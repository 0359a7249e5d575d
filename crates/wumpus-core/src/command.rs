#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Effect issued by an agent to the cave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Command {
    TurnLeft,
    TurnRight,
    Forward,
    Grab,
    Shoot,
    Climb,
}
