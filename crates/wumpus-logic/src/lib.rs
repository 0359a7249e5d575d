//! # wumpus-logic
//!
//! Propositional reasoning for the hybrid wumpus agent.
//!
//! - [`Expr`]: immutable logic expression tree (predicates and connectives)
//! - [`KnowledgeBase`]: append-only facts and rules
//! - [`InferenceEngine`]: grounds rules against facts by unification, then computes
//!   `P(query | facts, rules)` by exhaustive model checking over the unknown atoms
//!
//! ## Example
//!
//! ```rust
//! use wumpus_logic::*;
//!
//! let mut kb = KnowledgeBase::new();
//! kb.add_fact(Expr::pred("Breeze", ["1", "1"]));
//! kb.add_rule(Expr::implies(
//!     Expr::pred("Breeze", ["x", "y"]),
//!     Expr::any([
//!         Expr::pred("Pit", ["x+1", "y"]),
//!         Expr::pred("Pit", ["x-1", "y"]),
//!         Expr::pred("Pit", ["x", "y+1"]),
//!         Expr::pred("Pit", ["x", "y-1"]),
//!     ]),
//! ));
//!
//! let p = InferenceEngine::new(&kb).model_check_probability(&Expr::pred("Pit", ["1", "2"]));
//! assert!((p - 8.0 / 15.0).abs() < 1e-12);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod expr;
pub mod inference;
pub mod kb;
pub mod term;
pub mod unify;

pub use expr::Expr;
pub use inference::{Assessment, InferenceConfig, InferenceEngine, NoInformation, NO_INFORMATION};
pub use kb::{KnowledgeBase, LoadReport};
pub use unify::{unify, Bindings};

use thiserror::Error;

/// Errors raised while exchanging facts and rules with the outside world.
///
/// Inference itself never fails: contradictions and oversized searches are reported
/// through [`Assessment`].
#[derive(Debug, Error)]
pub enum LogicError {
    #[error("expected a JSON array of {kind}")]
    NotAnArray { kind: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LogicError>;
