#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wumpus_core::{CaveMut, CaveView, Command, Coord, Direction, Percepts};

use crate::layout::CaveLayout;

/// Point changes applied by the cave.
pub mod scoring {
    pub const ACTION: i64 = -1;
    pub const ARROW: i64 = -10;
    pub const DEATH: i64 = -1000;
    pub const GRAB: i64 = 10;
    pub const GOLD: i64 = 1000;
}

/// Running totals for one game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Score {
    pub points: i64,
    pub actions: u32,
}

/// A playable cave: layout plus agent state.
///
/// The agent enters with one arrow and can only climb out where it entered.
#[derive(Debug, Clone)]
pub struct Cave {
    layout: CaveLayout,
    entrance: Coord,
    position: Coord,
    facing: Direction,
    alive: bool,
    climbed: bool,
    has_arrow: bool,
    has_gold: bool,
    score: Score,
    commands: Vec<Command>,
    shots: Vec<(Coord, Direction)>,
}

impl Cave {
    /// Enter at the origin facing East.
    pub fn new(layout: CaveLayout) -> Self {
        Self::with_entrance(layout, Coord::ORIGIN, Direction::East)
    }

    pub fn with_entrance(layout: CaveLayout, entrance: Coord, facing: Direction) -> Self {
        Self {
            layout,
            entrance,
            position: entrance,
            facing,
            alive: true,
            climbed: false,
            has_arrow: true,
            has_gold: false,
            score: Score::default(),
            commands: Vec::new(),
            shots: Vec::new(),
        }
    }

    pub fn entrance(&self) -> Coord {
        self.entrance
    }

    pub fn layout(&self) -> &CaveLayout {
        &self.layout
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Every arrow fired, with the cell and heading it was fired from.
    pub fn shots(&self) -> &[(Coord, Direction)] {
        &self.shots
    }

    pub fn agent_has_gold(&self) -> bool {
        self.has_gold
    }

    pub fn climbed_out(&self) -> bool {
        self.climbed
    }

    pub fn is_over(&self) -> bool {
        !self.alive || self.climbed
    }

    /// Log the command and charge for it. Returns `false` when the game is already over.
    fn begin(&mut self, command: Command) -> bool {
        if self.is_over() {
            tracing::warn!(?command, alive = self.alive, "command ignored; game is over");
            return false;
        }
        self.commands.push(command);
        self.score.actions += 1;
        self.score.points += scoring::ACTION;
        true
    }
}

impl CaveView for Cave {
    fn size(&self) -> i32 {
        self.layout.size()
    }

    fn agent_position(&self) -> Coord {
        self.position
    }

    fn agent_facing(&self) -> Direction {
        self.facing
    }

    fn agent_alive(&self) -> bool {
        self.alive
    }

    fn percepts(&self) -> Percepts {
        if self.is_over() {
            return Percepts::none();
        }
        self.layout.percepts_at(self.position)
    }
}

impl CaveMut for Cave {
    fn turn_left(&mut self) {
        if self.begin(Command::TurnLeft) {
            self.facing = self.facing.turn_left();
        }
    }

    fn turn_right(&mut self) {
        if self.begin(Command::TurnRight) {
            self.facing = self.facing.turn_right();
        }
    }

    fn move_forward(&mut self) {
        if !self.begin(Command::Forward) {
            return;
        }
        let next = self.position.step(self.facing);
        if !next.in_bounds(self.layout.size()) {
            tracing::debug!(at = %self.position, facing = %self.facing, "bumped into wall");
            return;
        }
        self.position = next;
        if !self.layout.is_free(next) {
            self.alive = false;
            self.score.points += scoring::DEATH;
            tracing::info!(at = %next, pit = self.layout.is_pit(next), "agent died");
        }
    }

    fn grab(&mut self) -> bool {
        if !self.begin(Command::Grab) {
            return false;
        }
        if self.layout.take_gold(self.position) {
            self.has_gold = true;
            self.score.points += scoring::GRAB;
            return true;
        }
        false
    }

    fn shoot(&mut self) -> bool {
        if !self.has_arrow {
            tracing::warn!(at = %self.position, "no arrow left");
            return false;
        }
        if !self.begin(Command::Shoot) {
            return false;
        }
        self.has_arrow = false;
        self.score.points += scoring::ARROW;
        self.shots.push((self.position, self.facing));

        let mut cell = self.position.step(self.facing);
        while cell.in_bounds(self.layout.size()) {
            if self.layout.remove_wumpus(cell) {
                tracing::info!(from = %self.position, target = %cell, "wumpus killed");
                return true;
            }
            cell = cell.step(self.facing);
        }
        false
    }

    fn climb_out(&mut self) {
        if self.position != self.entrance {
            tracing::warn!(at = %self.position, entrance = %self.entrance, "can only climb out at the entrance");
            return;
        }
        if !self.begin(Command::Climb) {
            return;
        }
        self.climbed = true;
        if self.has_gold {
            self.score.points += scoring::GOLD;
        }
    }
}
