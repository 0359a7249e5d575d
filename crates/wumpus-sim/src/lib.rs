//! Reference cave simulator.
//!
//! Generates random caves from an explicit seed and plays out an agent's commands with
//! percepts, scoring and a command log. Agents only see it through
//! [`wumpus_core::CaveView`] and [`wumpus_core::CaveMut`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod cave;
pub mod layout;
pub mod rng;

pub use cave::{scoring, Cave, Score};
pub use layout::{CaveLayout, GenerationParams};
pub use rng::{DeterministicRng, SplitMix64};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    #[error("cave of size {size} has no room for {wumpus_count} wumpi")]
    Crowded { size: i32, wumpus_count: usize },

    #[error("cave size must be positive, got {0}")]
    InvalidSize(i32),

    #[error("pit probability must lie in [0, 1], got {0}")]
    InvalidProbability(f64),
}

pub type Result<T> = std::result::Result<T, SimError>;
