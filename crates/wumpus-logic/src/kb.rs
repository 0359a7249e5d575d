//! Append-only knowledge base of facts and rules.

use serde::{Deserialize, Serialize};

use crate::expr::Expr;
use crate::{LogicError, Result};

/// Ordered facts and rules for one game.
///
/// Entries are never removed. Re-asserting an existing fact or rule is a no-op, so the
/// sequences hold each expression at most once, in first-assertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    facts: Vec<Expr>,
    rules: Vec<Expr>,
}

/// Outcome of a bulk load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    pub added: usize,
    pub duplicates: usize,
    pub skipped: usize,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assert a ground fact. Returns `false` if it was already known.
    ///
    /// Groundness is the caller's responsibility and is not checked.
    pub fn add_fact(&mut self, fact: Expr) -> bool {
        if self.facts.contains(&fact) {
            return false;
        }
        self.facts.push(fact);
        true
    }

    /// Store a rule verbatim. Returns `false` if it was already stored.
    pub fn add_rule(&mut self, rule: Expr) -> bool {
        if !matches!(rule, Expr::Implies(_, _)) {
            tracing::debug!(rule = %rule, "storing rule that is not an implication");
        }
        if self.rules.contains(&rule) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    /// Fold a newly observed fact into the knowledge base; same as [`Self::add_fact`].
    pub fn update_kb(&mut self, fact: Expr) -> bool {
        self.add_fact(fact)
    }

    pub fn facts(&self) -> &[Expr] {
        &self.facts
    }

    pub fn rules(&self) -> &[Expr] {
        &self.rules
    }

    pub fn contains_fact(&self, fact: &Expr) -> bool {
        self.facts.contains(fact)
    }

    pub fn len(&self) -> usize {
        self.facts.len() + self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty() && self.rules.is_empty()
    }

    /// Unique predicate leaves of every rule, in first-seen order.
    pub fn flatten_rule_symbols(&self) -> Vec<Expr> {
        let mut out: Vec<Expr> = Vec::new();
        for rule in &self.rules {
            for atom in rule.atoms() {
                if !out.contains(atom) {
                    out.push(atom.clone());
                }
            }
        }
        out
    }

    pub fn extend_facts(&mut self, facts: impl IntoIterator<Item = Expr>) -> LoadReport {
        let mut report = LoadReport::default();
        for fact in facts {
            report.record(self.add_fact(fact));
        }
        report
    }

    pub fn extend_rules(&mut self, rules: impl IntoIterator<Item = Expr>) -> LoadReport {
        let mut report = LoadReport::default();
        for rule in rules {
            report.record(self.add_rule(rule));
        }
        report
    }

    /// Load facts from a JSON array of serialized expressions.
    ///
    /// Elements that are not valid expressions are logged and skipped.
    pub fn extend_facts_json(&mut self, json: &str) -> Result<LoadReport> {
        let (entries, skipped) = parse_entries(json, "facts")?;
        let mut report = self.extend_facts(entries);
        report.skipped = skipped;
        Ok(report)
    }

    /// Load rules from a JSON array of serialized expressions.
    ///
    /// Elements that are not valid expressions are logged and skipped.
    pub fn extend_rules_json(&mut self, json: &str) -> Result<LoadReport> {
        let (entries, skipped) = parse_entries(json, "rules")?;
        let mut report = self.extend_rules(entries);
        report.skipped = skipped;
        Ok(report)
    }
}

impl LoadReport {
    fn record(&mut self, added: bool) {
        if added {
            self.added += 1;
        } else {
            self.duplicates += 1;
        }
    }
}

fn parse_entries(json: &str, kind: &'static str) -> Result<(Vec<Expr>, usize)> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(LogicError::NotAnArray { kind });
    };

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Expr>(item) {
            Ok(expr) => entries.push(expr),
            Err(err) => {
                tracing::warn!(kind, index, error = %err, "skipping malformed entry");
                skipped += 1;
            }
        }
    }
    Ok((entries, skipped))
}
