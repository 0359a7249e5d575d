//! # wumpus-agent
//!
//! The hybrid agent policy. Each turn it folds percepts into a [`KnowledgeBase`], asks the
//! inference engine how lethal the unexplored neighbors are, and plans through the cells
//! it believes safe. Priorities: grab the gold, explore safe cells, hunt a confirmed
//! wumpus, gamble on the least risky cell, and finally retreat to the entrance.
//!
//! [`KnowledgeBase`]: wumpus_logic::KnowledgeBase

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod agent;
pub mod config;
pub mod episode;
pub mod risk;
pub mod trace;

pub use agent::{HybridAgent, ShotPlan, TurnOutcome};
pub use config::AgentConfig;
pub use episode::{run_episode, EpisodeSummary};
pub use trace::{Decision, DecisionKind, DecisionLog};
