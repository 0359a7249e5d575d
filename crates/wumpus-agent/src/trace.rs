use serde::{Deserialize, Serialize};
use wumpus_core::Coord;

/// What the agent chose to do on a turn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DecisionKind {
    Grab,
    Explore { target: Coord },
    Hunt { threat: Coord, position: Coord },
    Fire { target: Coord, hit: bool },
    Gamble { target: Coord, risk: f64 },
    Retreat,
    Climb,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub turn: u64,
    pub at: Coord,
    pub kind: DecisionKind,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionLog {
    pub decisions: Vec<Decision>,
}

impl DecisionLog {
    pub fn push(&mut self, decision: Decision) {
        tracing::debug!(
            turn = decision.turn,
            at = %decision.at,
            kind = ?decision.kind,
            "decision"
        );
        self.decisions.push(decision);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decision> {
        self.decisions.iter()
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn last(&self) -> Option<&Decision> {
        self.decisions.last()
    }

    pub fn count(&self, pred: impl Fn(&DecisionKind) -> bool) -> usize {
        self.decisions.iter().filter(|d| pred(&d.kind)).count()
    }
}
