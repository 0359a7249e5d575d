use core::cmp::Ordering;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wumpus_core::{Coord, Direction};

use crate::Route;

const STRAIGHT_COST: u32 = 1;
const TURN_COST: u32 = 2;

#[derive(Debug)]
struct OpenNode {
    f: u32,
    g: u32,
    cell: Coord,
    tie: u64,
}

impl OpenNode {
    fn key(&self) -> (u32, u32, Coord, u64) {
        (self.f, self.g, self.cell, self.tie)
    }
}

impl PartialEq for OpenNode {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for OpenNode {}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

/// Grows the set of cells believed safe and plans routes through it.
///
/// A move costs 1 when it keeps the current facing and 2 when a turn is needed first.
/// Only the direction of arrival is remembered per cell, not a full `(cell, facing)`
/// state, so a cheaper arrival from another side can shadow a better continuation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanningModule {
    space: BTreeSet<Coord>,
}

impl PlanningModule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the cell was already safe.
    pub fn add_safe_cell(&mut self, cell: Coord) -> bool {
        self.space.insert(cell)
    }

    pub fn is_safe(&self, cell: Coord) -> bool {
        self.space.contains(&cell)
    }

    pub fn safe_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.space.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.space.len()
    }

    pub fn is_empty(&self) -> bool {
        self.space.is_empty()
    }

    /// Cheapest route from `start` to `goal` through safe cells.
    ///
    /// `start` itself need not be in the safe set. Returns an empty route when
    /// `start == goal` and `None` when the goal is not reachable.
    pub fn find_route(&self, start: Coord, goal: Coord, facing: Direction) -> Option<Route> {
        if start == goal {
            return Some(Route::default());
        }
        if !self.is_safe(goal) {
            return None;
        }

        let mut open = BinaryHeap::<OpenNode>::new();
        let mut tie: u64 = 0;

        let mut g_score: HashMap<Coord, u32> = HashMap::new();
        let mut arrival: HashMap<Coord, Direction> = HashMap::new();
        let mut came_from: HashMap<Coord, Coord> = HashMap::new();

        g_score.insert(start, 0);
        arrival.insert(start, facing);
        open.push(OpenNode {
            f: start.manhattan(goal),
            g: 0,
            cell: start,
            tie,
        });
        tie += 1;

        while let Some(node) = open.pop() {
            if node.cell == goal {
                let steps = reconstruct(&came_from, start, goal);
                tracing::trace!(%start, %goal, cost = node.g, steps = steps.len(), "route found");
                return Some(Route::new(steps, node.g));
            }

            if g_score.get(&node.cell).copied() != Some(node.g) {
                // Stale heap entry.
                continue;
            }
            let heading = arrival.get(&node.cell).copied().unwrap_or(facing);

            for dir in Direction::ALL {
                let next = node.cell.step(dir);
                if !self.is_safe(next) {
                    continue;
                }

                let edge = if dir == heading { STRAIGHT_COST } else { TURN_COST };
                let tentative_g = node.g.saturating_add(edge);
                if g_score.get(&next).is_some_and(|&g| tentative_g >= g) {
                    continue;
                }

                came_from.insert(next, node.cell);
                g_score.insert(next, tentative_g);
                arrival.insert(next, dir);
                open.push(OpenNode {
                    f: tentative_g.saturating_add(next.manhattan(goal)),
                    g: tentative_g,
                    cell: next,
                    tie,
                });
                tie += 1;
            }
        }

        None
    }

    /// The cheapest reachable goal among `goals` with its route.
    ///
    /// Ties on cost go to the earliest candidate.
    pub fn nearest_goal_route<I>(
        &self,
        start: Coord,
        goals: I,
        facing: Direction,
    ) -> Option<(Coord, Route)>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut best: Option<(Coord, Route)> = None;
        for goal in goals {
            let Some(route) = self.find_route(start, goal, facing) else {
                continue;
            };
            let better = match &best {
                Some((_, current)) => route.cost < current.cost,
                None => true,
            };
            if better {
                best = Some((goal, route));
            }
        }
        best
    }
}

impl Extend<Coord> for PlanningModule {
    fn extend<T: IntoIterator<Item = Coord>>(&mut self, iter: T) {
        self.space.extend(iter);
    }
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, start: Coord, goal: Coord) -> Vec<Coord> {
    let mut out = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        if prev == start {
            break;
        }
        current = prev;
        out.push(current);
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_safe_cell_is_idempotent() {
        let mut planner = PlanningModule::new();
        assert!(planner.add_safe_cell(Coord::new(1, 1)));
        assert!(!planner.add_safe_cell(Coord::new(1, 1)));
        assert_eq!(planner.len(), 1);
    }

    #[test]
    fn straight_corridor_costs_one_per_step() {
        let mut planner = PlanningModule::new();
        planner.extend((1..4).map(|x| Coord::new(x, 0)));
        let route = planner
            .find_route(Coord::ORIGIN, Coord::new(3, 0), Direction::East)
            .expect("route");
        assert_eq!(route.cost, 3);
        assert_eq!(route.goal(), Some(Coord::new(3, 0)));
    }

    #[test]
    fn facing_away_pays_for_the_turn() {
        let mut planner = PlanningModule::new();
        planner.add_safe_cell(Coord::new(1, 0));
        let route = planner
            .find_route(Coord::ORIGIN, Coord::new(1, 0), Direction::West)
            .expect("route");
        assert_eq!(route.steps, vec![Coord::new(1, 0)]);
        assert_eq!(route.cost, 2);
    }
}
