#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cell coordinate on the square cave grid. `y` grows to the North.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const ORIGIN: Coord = Coord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Direction) -> Coord {
        let (dx, dy) = dir.delta();
        Coord::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Coord) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }

    pub fn in_bounds(self, size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.x < size && self.y < size
    }

    /// The four grid neighbors in fixed N, E, S, W order, unbounded.
    pub fn neighbors(self) -> [Coord; 4] {
        Direction::ALL.map(|dir| self.step(dir))
    }

    /// Neighbors inside a grid of side `size`, in the same fixed order.
    pub fn neighbors_within(self, size: i32) -> impl Iterator<Item = Coord> {
        self.neighbors().into_iter().filter(move |c| c.in_bounds(size))
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }

    /// Heading that moves `self` onto an adjacent `other`.
    pub fn direction_to(self, other: Coord) -> Option<Direction> {
        Direction::ALL.into_iter().find(|dir| self.step(*dir) == other)
    }

    /// Heading from `self` along a shared row or column towards `other`.
    ///
    /// Returns `None` for diagonal placements and for `self == other`.
    pub fn line_of_fire(self, other: Coord) -> Option<Direction> {
        match (other.x - self.x, other.y - self.y) {
            (0, dy) if dy > 0 => Some(Direction::North),
            (0, dy) if dy < 0 => Some(Direction::South),
            (dx, 0) if dx > 0 => Some(Direction::East),
            (dx, 0) if dx < 0 => Some(Direction::West),
            _ => None,
        }
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

/// Compass heading of the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn turn_left(self) -> Direction {
        match self {
            Direction::North => Direction::West,
            Direction::West => Direction::South,
            Direction::South => Direction::East,
            Direction::East => Direction::North,
        }
    }

    pub fn turn_right(self) -> Direction {
        match self {
            Direction::North => Direction::East,
            Direction::East => Direction::South,
            Direction::South => Direction::West,
            Direction::West => Direction::North,
        }
    }

    /// Signed quarter turns from `self` to `target`: `-1` left, `1` right, `2` about-face.
    pub fn quarter_turns_to(self, target: Direction) -> i8 {
        let from = self as i8;
        let to = target as i8;
        match (to - from).rem_euclid(4) {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => -1,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Direction::North => "N",
            Direction::East => "E",
            Direction::South => "S",
            Direction::West => "W",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_use_fixed_order() {
        let c = Coord::new(2, 2);
        assert_eq!(
            c.neighbors(),
            [
                Coord::new(2, 3),
                Coord::new(3, 2),
                Coord::new(2, 1),
                Coord::new(1, 2)
            ]
        );
    }

    #[test]
    fn neighbors_within_clip_to_grid() {
        let corner: Vec<Coord> = Coord::ORIGIN.neighbors_within(4).collect();
        assert_eq!(corner, vec![Coord::new(0, 1), Coord::new(1, 0)]);
    }

    #[test]
    fn line_of_fire_rejects_diagonals() {
        let a = Coord::new(1, 1);
        assert_eq!(a.line_of_fire(Coord::new(1, 3)), Some(Direction::North));
        assert_eq!(a.line_of_fire(Coord::new(0, 1)), Some(Direction::West));
        assert_eq!(a.line_of_fire(Coord::new(2, 2)), None);
        assert_eq!(a.line_of_fire(a), None);
    }

    #[test]
    fn quarter_turns_pick_shortest_rotation() {
        assert_eq!(Direction::East.quarter_turns_to(Direction::East), 0);
        assert_eq!(Direction::East.quarter_turns_to(Direction::South), 1);
        assert_eq!(Direction::East.quarter_turns_to(Direction::North), -1);
        assert_eq!(Direction::East.quarter_turns_to(Direction::West), 2);
        assert_eq!(Direction::North.quarter_turns_to(Direction::West), -1);
    }

    #[test]
    fn turning_four_times_is_identity() {
        for dir in Direction::ALL {
            let mut d = dir;
            for _ in 0..4 {
                d = d.turn_left();
            }
            assert_eq!(d, dir);
            assert_eq!(dir.turn_left().turn_right(), dir);
        }
    }
}
