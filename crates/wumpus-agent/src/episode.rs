use serde::{Deserialize, Serialize};
use wumpus_core::CaveMut;

use crate::agent::{HybridAgent, TurnOutcome};

/// Consecutive stalled turns after which an episode is abandoned.
pub const MAX_CONSECUTIVE_STALLS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub turns: u64,
    /// Outcome of the last turn played.
    pub outcome: TurnOutcome,
    pub stalls: u64,
}

impl EpisodeSummary {
    pub fn finished(&self) -> bool {
        self.outcome.is_terminal()
    }
}

/// Step `agent` until it finishes, stalls repeatedly, or `max_turns` runs out.
pub fn run_episode<W: CaveMut>(
    agent: &mut HybridAgent,
    world: &mut W,
    max_turns: u64,
) -> EpisodeSummary {
    let mut summary = EpisodeSummary {
        turns: 0,
        outcome: TurnOutcome::Stalled,
        stalls: 0,
    };
    let mut consecutive = 0;

    while summary.turns < max_turns {
        let outcome = agent.step(world);
        summary.turns += 1;
        summary.outcome = outcome;

        if outcome.is_terminal() {
            break;
        }
        if outcome.made_progress() {
            consecutive = 0;
            continue;
        }

        summary.stalls += 1;
        consecutive += 1;
        if consecutive >= MAX_CONSECUTIVE_STALLS {
            tracing::warn!(turns = summary.turns, "agent stalled; ending episode");
            break;
        }
    }

    tracing::info!(
        turns = summary.turns,
        outcome = ?summary.outcome,
        stalls = summary.stalls,
        inference_calls = agent.inference_calls(),
        "episode finished"
    );
    summary
}
