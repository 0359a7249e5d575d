//! Probabilistic inference by exhaustive model checking.
//!
//! For a query `q` the engine computes `P(q | facts, rules)`:
//!
//! 1. A query that is itself a stored fact scores `1.0`.
//! 2. Every rule is grounded against every fact by unifying the fact with the rule's
//!    antecedent (see [`crate::unify`]).
//! 3. Atoms of the grounded rules (and of the query) that the facts do not pin are the
//!    unknowns. A positive fact pins its atom true, a `Not(p)` fact pins `p` false.
//! 4. All `2^n` assignments of the unknowns are enumerated. An assignment is a consistent
//!    model when every grounded rule holds in it.
//! 5. The result is `satisfying / consistent`.
//!
//! When nothing constrains the domain (no grounded rule), when no model is consistent, or
//! when the unknowns exceed the configured cap, the engine answers [`NO_INFORMATION`].

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::kb::KnowledgeBase;
use crate::unify::unify;

/// Sentinel probability meaning "no information". Risk logic downstream matches on it.
pub const NO_INFORMATION: f64 = 0.5;

/// Hard ceiling for enumeration: assignments are indexed by a `u64` bitmask.
const MAX_ENUMERABLE: usize = 63;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Largest number of unknown atoms to enumerate. Clamped to 63.
    pub max_unknowns: usize,

    /// Enumerate only the grounded rules connected to the query through shared unknown
    /// atoms (plus rules without unknowns). Differs from full enumeration only when a
    /// disconnected group of rules is unsatisfiable on its own.
    pub relevance_pruning: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            max_unknowns: 20,
            relevance_pruning: false,
        }
    }
}

/// Why the engine fell back to [`NO_INFORMATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoInformation {
    /// No rule unified with any fact.
    NoGroundedRules,
    /// The grounded rules admit no model.
    Unsatisfiable,
    /// Enumeration would exceed the configured cap.
    TooManyUnknowns { unknowns: usize, limit: usize },
}

/// Outcome of a single query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assessment {
    /// The query is a stored fact.
    KnownFact,
    /// Exhaustive enumeration over `unknowns` atoms.
    Enumerated {
        consistent: u64,
        satisfying: u64,
        unknowns: usize,
    },
    /// Fallback to the sentinel.
    NoInformation(NoInformation),
}

impl Assessment {
    pub fn probability(&self) -> f64 {
        match *self {
            Self::KnownFact => 1.0,
            Self::Enumerated {
                consistent,
                satisfying,
                ..
            } => satisfying as f64 / consistent as f64,
            Self::NoInformation(_) => NO_INFORMATION,
        }
    }

    pub fn is_informative(&self) -> bool {
        !matches!(self, Self::NoInformation(_))
    }
}

/// Model-checking engine bound to a knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct InferenceEngine<'kb> {
    kb: &'kb KnowledgeBase,
    config: InferenceConfig,
}

/// Facts split into pinned-true and pinned-false atoms.
struct KnownAtoms<'a> {
    true_atoms: HashSet<&'a Expr>,
    false_atoms: HashSet<&'a Expr>,
}

impl<'a> KnownAtoms<'a> {
    fn from_facts(facts: &'a [Expr]) -> Self {
        let mut true_atoms = HashSet::new();
        let mut false_atoms = HashSet::new();
        for fact in facts {
            if fact.is_predicate() {
                true_atoms.insert(fact);
            } else if let Some(atom) = fact.negated_predicate() {
                false_atoms.insert(atom);
            }
        }
        Self {
            true_atoms,
            false_atoms,
        }
    }

    fn is_known(&self, atom: &Expr) -> bool {
        self.true_atoms.contains(atom) || self.false_atoms.contains(atom)
    }
}

impl<'kb> InferenceEngine<'kb> {
    pub fn new(kb: &'kb KnowledgeBase) -> Self {
        Self {
            kb,
            config: InferenceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: InferenceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    pub fn knowledge_base(&self) -> &'kb KnowledgeBase {
        self.kb
    }

    /// `P(query | facts, rules)`, or [`NO_INFORMATION`] when undetermined.
    pub fn model_check_probability(&self, query: &Expr) -> f64 {
        self.assess(query).probability()
    }

    /// Rules grounded against the current facts, de-duplicated, in discovery order.
    pub fn ground_rules(&self) -> Vec<Expr> {
        let mut grounded: Vec<Expr> = Vec::new();
        for rule in self.kb.rules() {
            let pattern = rule.antecedent();
            for fact in self.kb.facts() {
                let Some(bindings) = unify(pattern, fact) else {
                    continue;
                };
                let instance = bindings.apply(rule);
                if !grounded.contains(&instance) {
                    grounded.push(instance);
                }
            }
        }
        grounded
    }

    /// Atoms that enumeration would range over for `query`, in first-seen order.
    pub fn unknown_symbols(&self, query: &Expr) -> Vec<Expr> {
        let known = KnownAtoms::from_facts(self.kb.facts());
        let grounded = self.ground_rules();
        collect_unknowns(&grounded, query, &known)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn assess(&self, query: &Expr) -> Assessment {
        if self.kb.contains_fact(query) {
            return Assessment::KnownFact;
        }

        let grounded = self.ground_rules();
        if grounded.is_empty() {
            return Assessment::NoInformation(NoInformation::NoGroundedRules);
        }

        let known = KnownAtoms::from_facts(self.kb.facts());
        let mut unknowns = collect_unknowns(&grounded, query, &known);
        let mut rules: Vec<&Expr> = grounded.iter().collect();

        if self.config.relevance_pruning {
            (rules, unknowns) = relevant_subset(&grounded, query, &known);
        }

        let limit = self.config.max_unknowns.min(MAX_ENUMERABLE);
        if unknowns.len() > limit {
            tracing::warn!(
                query = %query,
                unknowns = unknowns.len(),
                limit,
                "too many unknown atoms; answering without information"
            );
            return Assessment::NoInformation(NoInformation::TooManyUnknowns {
                unknowns: unknowns.len(),
                limit,
            });
        }

        let (consistent, satisfying) = enumerate(&rules, query, &unknowns, &known);
        tracing::trace!(
            query = %query,
            rules = rules.len(),
            unknowns = unknowns.len(),
            consistent,
            satisfying,
            "model check"
        );

        if consistent == 0 {
            return Assessment::NoInformation(NoInformation::Unsatisfiable);
        }

        Assessment::Enumerated {
            consistent,
            satisfying,
            unknowns: unknowns.len(),
        }
    }
}

fn collect_unknowns<'a>(
    grounded: &'a [Expr],
    query: &'a Expr,
    known: &KnownAtoms<'_>,
) -> Vec<&'a Expr> {
    let mut out: Vec<&'a Expr> = Vec::new();
    let atoms = grounded
        .iter()
        .flat_map(|rule| rule.atoms())
        .chain(query.atoms());
    for atom in atoms {
        if !known.is_known(atom) && !out.contains(&atom) {
            out.push(atom);
        }
    }
    out
}

/// Grounded rules reachable from the query's unknown atoms, plus rules with no unknowns.
fn relevant_subset<'a>(
    grounded: &'a [Expr],
    query: &'a Expr,
    known: &KnownAtoms<'_>,
) -> (Vec<&'a Expr>, Vec<&'a Expr>) {
    let rule_unknowns: Vec<Vec<&Expr>> = grounded
        .iter()
        .map(|rule| {
            rule.atoms()
                .into_iter()
                .filter(|atom| !known.is_known(atom))
                .collect()
        })
        .collect();

    let mut relevant: Vec<&'a Expr> = query
        .atoms()
        .into_iter()
        .filter(|atom| !known.is_known(atom))
        .collect();
    let mut selected = vec![false; grounded.len()];

    loop {
        let mut grew = false;
        for (idx, atoms) in rule_unknowns.iter().enumerate() {
            if selected[idx] {
                continue;
            }
            let touches = atoms.is_empty() || atoms.iter().any(|a| relevant.contains(a));
            if !touches {
                continue;
            }
            selected[idx] = true;
            grew = true;
            for atom in atoms {
                if !relevant.contains(atom) {
                    relevant.push(*atom);
                }
            }
        }
        if !grew {
            break;
        }
    }

    let rules = grounded
        .iter()
        .zip(selected)
        .filter_map(|(rule, keep)| keep.then_some(rule))
        .collect();
    (rules, relevant)
}

fn enumerate(
    rules: &[&Expr],
    query: &Expr,
    unknowns: &[&Expr],
    known: &KnownAtoms<'_>,
) -> (u64, u64) {
    let index: HashMap<&Expr, usize> = unknowns
        .iter()
        .enumerate()
        .map(|(i, atom)| (*atom, i))
        .collect();

    let mut consistent: u64 = 0;
    let mut satisfying: u64 = 0;
    let models: u64 = 1u64 << unknowns.len();

    for mask in 0..models {
        let truth = |atom: &Expr| -> bool {
            if known.true_atoms.contains(atom) {
                return true;
            }
            match index.get(atom) {
                Some(bit) => mask & (1u64 << bit) != 0,
                None => false,
            }
        };

        if !rules.iter().all(|rule| rule.evaluate(&truth)) {
            continue;
        }
        consistent += 1;
        if query.evaluate(&truth) {
            satisfying += 1;
        }
    }

    (consistent, satisfying)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breeze_kb() -> KnowledgeBase {
        let mut kb = KnowledgeBase::new();
        kb.add_fact(Expr::pred("Breeze", ["1", "1"]));
        kb.add_rule(Expr::implies(
            Expr::pred("Breeze", ["1", "1"]),
            Expr::any([
                Expr::pred("Pit", ["2", "1"]),
                Expr::pred("Pit", ["0", "1"]),
                Expr::pred("Pit", ["1", "2"]),
                Expr::pred("Pit", ["1", "0"]),
            ]),
        ));
        kb
    }

    #[test]
    fn test_enumeration_counts() {
        let kb = breeze_kb();
        let engine = InferenceEngine::new(&kb);
        let assessment = engine.assess(&Expr::pred("Pit", ["1", "2"]));
        assert_eq!(
            assessment,
            Assessment::Enumerated {
                consistent: 15,
                satisfying: 8,
                unknowns: 4
            }
        );
    }

    #[test]
    fn test_negated_fact_pins_atom_false() {
        let mut kb = breeze_kb();
        kb.add_fact(Expr::not(Expr::pred("Pit", ["2", "1"])));
        kb.add_fact(Expr::not(Expr::pred("Pit", ["0", "1"])));
        kb.add_fact(Expr::not(Expr::pred("Pit", ["1", "0"])));

        let engine = InferenceEngine::new(&kb);
        let pit = Expr::pred("Pit", ["1", "2"]);
        assert_eq!(engine.unknown_symbols(&pit), vec![pit.clone()]);
        assert_eq!(engine.model_check_probability(&pit), 1.0);
        assert_eq!(
            engine.model_check_probability(&Expr::pred("Pit", ["2", "1"])),
            0.0
        );
    }

    #[test]
    fn test_pruning_ignores_unrelated_rules() {
        let mut kb = breeze_kb();
        kb.add_fact(Expr::pred("Stench", ["3", "3"]));
        kb.add_rule(Expr::implies(
            Expr::pred("Stench", ["3", "3"]),
            Expr::any([
                Expr::pred("Wumpus", ["3", "2"]),
                Expr::pred("Wumpus", ["2", "3"]),
            ]),
        ));

        let pit = Expr::pred("Pit", ["1", "2"]);
        let full = InferenceEngine::new(&kb).assess(&pit);
        let pruned = InferenceEngine::new(&kb)
            .with_config(InferenceConfig {
                relevance_pruning: true,
                ..InferenceConfig::default()
            })
            .assess(&pit);

        assert_eq!(full.probability(), pruned.probability());
        assert!(matches!(full, Assessment::Enumerated { unknowns: 6, .. }));
        assert!(matches!(pruned, Assessment::Enumerated { unknowns: 4, .. }));
    }
}
