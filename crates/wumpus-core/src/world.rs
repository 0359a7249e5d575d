use crate::{Coord, Direction, Percepts};

/// Read-only cave access for one agent.
///
/// The agent never sees hazard placement; simulators expose that on their own types.
pub trait CaveView {
    /// Side length of the square grid.
    fn size(&self) -> i32;
    fn agent_position(&self) -> Coord;
    fn agent_facing(&self) -> Direction;
    fn agent_alive(&self) -> bool;
    fn percepts(&self) -> Percepts;
}

/// Effect sink for the agent's commands.
pub trait CaveMut: CaveView {
    fn turn_left(&mut self);
    fn turn_right(&mut self);
    fn move_forward(&mut self);
    /// Pick up the prize at the current cell. Returns whether anything was picked up.
    fn grab(&mut self) -> bool;
    /// Fire the single-use arrow along the facing direction. Returns whether a wumpus died.
    fn shoot(&mut self) -> bool;
    fn climb_out(&mut self);
}
