use std::collections::BTreeSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use wumpus_core::{Coord, Percepts};

use crate::rng::DeterministicRng;
use crate::{Result, SimError};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GenerationParams {
    pub size: i32,
    /// Independent chance of a pit in every cell except the origin.
    pub pit_probability: f64,
    pub wumpus_count: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            size: 4,
            pit_probability: 0.2,
            wumpus_count: 1,
        }
    }
}

/// Hazard and prize placement for one cave.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaveLayout {
    size: i32,
    pits: BTreeSet<Coord>,
    wumpi: BTreeSet<Coord>,
    gold: Option<Coord>,
}

impl CaveLayout {
    /// An empty cave of side `size`.
    pub fn new(size: i32) -> Self {
        Self {
            size,
            pits: BTreeSet::new(),
            wumpi: BTreeSet::new(),
            gold: None,
        }
    }

    #[must_use]
    pub fn with_pit(mut self, at: impl Into<Coord>) -> Self {
        self.pits.insert(at.into());
        self
    }

    #[must_use]
    pub fn with_wumpus(mut self, at: impl Into<Coord>) -> Self {
        self.wumpi.insert(at.into());
        self
    }

    #[must_use]
    pub fn with_gold(mut self, at: impl Into<Coord>) -> Self {
        self.gold = Some(at.into());
        self
    }

    /// Random cave: pits first, then wumpi on distinct free cells, then the gold.
    ///
    /// The origin never holds a hazard.
    pub fn generate<R: DeterministicRng>(params: &GenerationParams, rng: &mut R) -> Result<Self> {
        if params.size <= 0 {
            return Err(SimError::InvalidSize(params.size));
        }
        if !(0.0..=1.0).contains(&params.pit_probability) {
            return Err(SimError::InvalidProbability(params.pit_probability));
        }

        let mut layout = Self::new(params.size);
        let cells: Vec<Coord> = (0..params.size)
            .flat_map(|y| (0..params.size).map(move |x| Coord::new(x, y)))
            .collect();

        for &cell in &cells {
            if cell != Coord::ORIGIN && rng.next_f64_unit() < params.pit_probability {
                layout.pits.insert(cell);
            }
        }

        let mut free: Vec<Coord> = cells
            .iter()
            .copied()
            .filter(|c| *c != Coord::ORIGIN && !layout.pits.contains(c))
            .collect();
        if free.len() < params.wumpus_count {
            return Err(SimError::Crowded {
                size: params.size,
                wumpus_count: params.wumpus_count,
            });
        }
        for _ in 0..params.wumpus_count {
            let pick = rng.next_index(free.len());
            layout.wumpi.insert(free.swap_remove(pick));
        }

        let open: Vec<Coord> = cells
            .into_iter()
            .filter(|c| layout.is_free(*c))
            .collect();
        if !open.is_empty() {
            layout.gold = Some(open[rng.next_index(open.len())]);
        }

        tracing::debug!(
            size = params.size,
            pits = layout.pits.len(),
            wumpi = layout.wumpi.len(),
            gold = ?layout.gold,
            "generated cave"
        );
        Ok(layout)
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn pits(&self) -> impl Iterator<Item = Coord> + '_ {
        self.pits.iter().copied()
    }

    pub fn wumpi(&self) -> impl Iterator<Item = Coord> + '_ {
        self.wumpi.iter().copied()
    }

    pub fn gold(&self) -> Option<Coord> {
        self.gold
    }

    pub fn is_pit(&self, at: Coord) -> bool {
        self.pits.contains(&at)
    }

    pub fn is_wumpus(&self, at: Coord) -> bool {
        self.wumpi.contains(&at)
    }

    pub fn is_free(&self, at: Coord) -> bool {
        !self.is_pit(at) && !self.is_wumpus(at)
    }

    /// Returns whether a wumpus was there.
    pub fn remove_wumpus(&mut self, at: Coord) -> bool {
        self.wumpi.remove(&at)
    }

    pub fn take_gold(&mut self, at: Coord) -> bool {
        if self.gold == Some(at) {
            self.gold = None;
            return true;
        }
        false
    }

    /// Stench and breeze come from the four neighbors, glitter from the cell itself.
    pub fn percepts_at(&self, at: Coord) -> Percepts {
        let mut percepts = Percepts {
            glitter: self.gold == Some(at),
            ..Percepts::default()
        };
        for n in at.neighbors_within(self.size) {
            percepts.stench |= self.is_wumpus(n);
            percepts.breeze |= self.is_pit(n);
        }
        percepts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SplitMix64;

    #[test]
    fn percepts_follow_neighbors() {
        let layout = CaveLayout::new(4)
            .with_pit((2, 0))
            .with_wumpus((0, 2))
            .with_gold((1, 1));

        assert_eq!(layout.percepts_at(Coord::ORIGIN), Percepts::none());
        let p = layout.percepts_at(Coord::new(1, 0));
        assert!(p.breeze && !p.stench && !p.glitter);
        let p = layout.percepts_at(Coord::new(0, 1));
        assert!(p.stench && !p.breeze);
        assert!(layout.percepts_at(Coord::new(1, 1)).glitter);
    }

    #[test]
    fn generation_keeps_origin_clear() {
        let params = GenerationParams {
            size: 5,
            pit_probability: 0.5,
            wumpus_count: 2,
        };
        for seed in 0..50 {
            let layout = CaveLayout::generate(&params, &mut SplitMix64::new(seed)).unwrap();
            assert!(layout.is_free(Coord::ORIGIN));
            assert_eq!(layout.wumpi().count(), 2);
            assert!(layout.wumpi().all(|w| !layout.is_pit(w)));
            let gold = layout.gold().expect("origin is always free");
            assert!(layout.is_free(gold));
        }
    }

    #[test]
    fn crowded_cave_is_rejected() {
        let params = GenerationParams {
            size: 2,
            pit_probability: 0.0,
            wumpus_count: 4,
        };
        let err = CaveLayout::generate(&params, &mut SplitMix64::new(1)).unwrap_err();
        assert_eq!(
            err,
            SimError::Crowded {
                size: 2,
                wumpus_count: 4
            }
        );
    }
}
