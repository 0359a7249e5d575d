//! Logic expression trees.
//!
//! Expressions are immutable values compared structurally. Rules and facts share the
//! same representation; a fact is simply an expression whose arguments are all ground.

use serde::{Deserialize, Serialize};

use crate::term;

/// Propositional expression over predicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Expr {
    /// Atomic predicate, e.g. `Pit(1,2)` or `Breeze(x,y)`
    Predicate { name: String, args: Vec<String> },

    /// Negation (`!φ`)
    Not(Box<Expr>),

    /// Conjunction (`φ & ψ`)
    And(Box<Expr>, Box<Expr>),

    /// Disjunction (`φ | ψ`)
    Or(Box<Expr>, Box<Expr>),

    /// Material implication (`φ => ψ`)
    Implies(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Create a predicate
    pub fn pred<I, S>(name: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Predicate {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Negation
    pub fn not(e: Expr) -> Self {
        Self::Not(Box::new(e))
    }

    /// Conjunction
    pub fn and(left: Expr, right: Expr) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Disjunction
    pub fn or(left: Expr, right: Expr) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Material implication
    pub fn implies(antecedent: Expr, consequent: Expr) -> Self {
        Self::Implies(Box::new(antecedent), Box::new(consequent))
    }

    /// Right-nested disjunction of all operands. `None` for an empty input.
    pub fn try_any(operands: impl IntoIterator<Item = Expr>) -> Option<Self> {
        Self::fold_right(operands, Self::or)
    }

    /// Right-nested conjunction of all operands. `None` for an empty input.
    pub fn try_all(operands: impl IntoIterator<Item = Expr>) -> Option<Self> {
        Self::fold_right(operands, Self::and)
    }

    /// Right-nested disjunction. Panics on an empty input.
    pub fn any(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::try_any(operands).expect("disjunction needs at least one operand")
    }

    /// Right-nested conjunction. Panics on an empty input.
    pub fn all(operands: impl IntoIterator<Item = Expr>) -> Self {
        Self::try_all(operands).expect("conjunction needs at least one operand")
    }

    fn fold_right(
        operands: impl IntoIterator<Item = Expr>,
        join: fn(Expr, Expr) -> Expr,
    ) -> Option<Self> {
        let mut items: Vec<Expr> = operands.into_iter().collect();
        let mut acc = items.pop()?;
        while let Some(next) = items.pop() {
            acc = join(next, acc);
        }
        Some(acc)
    }

    pub fn is_predicate(&self) -> bool {
        matches!(self, Self::Predicate { .. })
    }

    /// The left side of an implication; any other expression is its own antecedent.
    pub fn antecedent(&self) -> &Expr {
        match self {
            Self::Implies(left, _) => &**left,
            other => other,
        }
    }

    /// `Some(p)` when this is `Not(p)` with `p` a predicate.
    pub fn negated_predicate(&self) -> Option<&Expr> {
        match self {
            Self::Not(inner) if inner.is_predicate() => Some(&**inner),
            _ => None,
        }
    }

    /// Predicate leaves in first-seen order, duplicates removed.
    pub fn atoms(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        self.collect_atoms(&mut out);
        out
    }

    fn collect_atoms<'a>(&'a self, out: &mut Vec<&'a Expr>) {
        match self {
            Self::Predicate { .. } => {
                if !out.contains(&self) {
                    out.push(self);
                }
            }
            Self::Not(inner) => inner.collect_atoms(out),
            Self::And(l, r) | Self::Or(l, r) | Self::Implies(l, r) => {
                l.collect_atoms(out);
                r.collect_atoms(out);
            }
        }
    }

    /// True when no argument anywhere in the tree mentions a variable.
    pub fn is_ground(&self) -> bool {
        match self {
            Self::Predicate { args, .. } => args.iter().all(|a| term::is_ground(a)),
            Self::Not(inner) => inner.is_ground(),
            Self::And(l, r) | Self::Or(l, r) | Self::Implies(l, r) => {
                l.is_ground() && r.is_ground()
            }
        }
    }

    /// Evaluate under a truth assignment for predicate leaves.
    pub fn evaluate<F>(&self, atom_truth: &F) -> bool
    where
        F: Fn(&Expr) -> bool,
    {
        match self {
            Self::Predicate { .. } => atom_truth(self),
            Self::Not(inner) => !inner.evaluate(atom_truth),
            Self::And(l, r) => l.evaluate(atom_truth) && r.evaluate(atom_truth),
            Self::Or(l, r) => l.evaluate(atom_truth) || r.evaluate(atom_truth),
            Self::Implies(l, r) => !l.evaluate(atom_truth) || r.evaluate(atom_truth),
        }
    }
}

/// Renders the textual rule syntax: `Pit(1,2)`, `!P`, `(A & B)`, `(A | B)`, `(A => B)`.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Predicate { name, args } => write!(f, "{}({})", name, args.join(",")),
            Self::Not(inner) => write!(f, "!{}", inner),
            Self::And(l, r) => write!(f, "({} & {})", l, r),
            Self::Or(l, r) => write!(f, "({} | {})", l, r),
            Self::Implies(l, r) => write!(f, "({} => {})", l, r),
        }
    }
}
