//! Unification of rule patterns against ground facts.

use std::collections::BTreeMap;

use crate::expr::Expr;
use crate::term;

/// Variable to constant substitution produced by [`unify`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    values: BTreeMap<String, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: &str) -> Option<&str> {
        self.values.get(var).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Bind `var` to `value`. Returns `false` if `var` is already bound to something else.
    pub fn bind(&mut self, var: &str, value: &str) -> bool {
        match self.values.get(var) {
            Some(existing) => existing == value,
            None => {
                self.values.insert(var.to_string(), value.to_string());
                true
            }
        }
    }

    /// Substitute bound variables into a single argument, folding arithmetic.
    pub fn resolve(&self, arg: &str) -> String {
        term::substitute(arg, |var| self.get(var))
    }

    /// Substitute bound variables throughout `expr`. Unbound variables are left in place.
    pub fn apply(&self, expr: &Expr) -> Expr {
        match expr {
            Expr::Predicate { name, args } => Expr::Predicate {
                name: name.clone(),
                args: args.iter().map(|a| self.resolve(a)).collect(),
            },
            Expr::Not(inner) => Expr::not(self.apply(inner)),
            Expr::And(l, r) => Expr::and(self.apply(l), self.apply(r)),
            Expr::Or(l, r) => Expr::or(self.apply(l), self.apply(r)),
            Expr::Implies(l, r) => Expr::implies(self.apply(l), self.apply(r)),
        }
    }
}

/// Unify a rule `pattern` with a `fact`.
///
/// Trees are walked in lock-step: predicates need the same name and arity, and every rule
/// variable binds to the fact's constant at the same position. Compound nodes unify on both
/// sides. When that fails, the fact may still match a single branch of an `And`/`Or`/`Not`
/// in the pattern; the resulting bindings then cover only that branch.
pub fn unify(pattern: &Expr, fact: &Expr) -> Option<Bindings> {
    unify_with(pattern, fact, Bindings::new())
}

fn unify_with(pattern: &Expr, fact: &Expr, bindings: Bindings) -> Option<Bindings> {
    let structural = match (pattern, fact) {
        (
            Expr::Predicate { name, args },
            Expr::Predicate {
                name: fact_name,
                args: fact_args,
            },
        ) => {
            // Two predicates either match or not; there is no branch to fall back to.
            return unify_predicate(name, args, fact_name, fact_args, bindings);
        }
        (Expr::Not(p), Expr::Not(f)) => unify_with(p, f, bindings.clone()),
        (Expr::And(pl, pr), Expr::And(fl, fr))
        | (Expr::Or(pl, pr), Expr::Or(fl, fr))
        | (Expr::Implies(pl, pr), Expr::Implies(fl, fr)) => {
            unify_with(pl, fl, bindings.clone()).and_then(|b| unify_with(pr, fr, b))
        }
        _ => None,
    };

    structural.or_else(|| unify_branch(pattern, fact, bindings))
}

fn unify_branch(pattern: &Expr, fact: &Expr, bindings: Bindings) -> Option<Bindings> {
    match pattern {
        Expr::And(l, r) | Expr::Or(l, r) => {
            unify_with(l, fact, bindings.clone()).or_else(|| unify_with(r, fact, bindings))
        }
        Expr::Not(inner) => unify_with(inner, fact, bindings),
        _ => None,
    }
}

fn unify_predicate(
    name: &str,
    args: &[String],
    fact_name: &str,
    fact_args: &[String],
    mut bindings: Bindings,
) -> Option<Bindings> {
    if name != fact_name || args.len() != fact_args.len() {
        return None;
    }

    for (arg, value) in args.iter().zip(fact_args) {
        if term::is_variable(arg) {
            if !bindings.bind(arg, value) {
                tracing::trace!(predicate = name, var = %arg, value = %value, "conflicting binding");
                return None;
            }
            continue;
        }

        let resolved = bindings.resolve(arg);
        if !term::is_ground(&resolved) || resolved != *value {
            return None;
        }
    }

    Some(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binds_variables_positionally() {
        let b = unify(
            &Expr::pred("Breeze", ["x", "y"]),
            &Expr::pred("Breeze", ["1", "2"]),
        )
        .expect("unifies");
        assert_eq!(b.get("x"), Some("1"));
        assert_eq!(b.get("y"), Some("2"));
    }

    #[test]
    fn rejects_mismatched_constants_and_names() {
        assert!(unify(
            &Expr::pred("Breeze", ["1", "y"]),
            &Expr::pred("Breeze", ["2", "2"])
        )
        .is_none());
        assert!(unify(
            &Expr::pred("Stench", ["x", "y"]),
            &Expr::pred("Breeze", ["2", "2"])
        )
        .is_none());
        assert!(unify(
            &Expr::pred("Breeze", ["x"]),
            &Expr::pred("Breeze", ["2", "2"])
        )
        .is_none());
    }

    #[test]
    fn rejects_inconsistent_bindings() {
        assert!(unify(
            &Expr::pred("Same", ["x", "x"]),
            &Expr::pred("Same", ["1", "2"])
        )
        .is_none());
        assert!(unify(
            &Expr::pred("Same", ["x", "x"]),
            &Expr::pred("Same", ["3", "3"])
        )
        .is_some());
    }

    #[test]
    fn arithmetic_pattern_matches_once_bound() {
        let b = unify(
            &Expr::pred("Next", ["x", "x+1"]),
            &Expr::pred("Next", ["1", "2"]),
        );
        assert!(b.is_some());
        assert!(unify(
            &Expr::pred("Next", ["x", "x+1"]),
            &Expr::pred("Next", ["1", "3"])
        )
        .is_none());
    }

    #[test]
    fn negations_unify_structurally() {
        let b = unify(
            &Expr::not(Expr::pred("Breeze", ["x", "y"])),
            &Expr::not(Expr::pred("Breeze", ["1", "2"])),
        )
        .expect("unifies");
        assert_eq!(b.get("y"), Some("2"));
    }

    #[test]
    fn fact_may_match_single_branch() {
        let pattern = Expr::and(
            Expr::pred("Stench", ["x", "y"]),
            Expr::pred("Breeze", ["a", "b"]),
        );
        let b = unify(&pattern, &Expr::pred("Breeze", ["3", "1"])).expect("branch match");
        assert_eq!(b.get("a"), Some("3"));
        assert_eq!(b.get("x"), None);

        let grounded = b.apply(&pattern);
        assert_eq!(
            grounded,
            Expr::and(
                Expr::pred("Stench", ["x", "y"]),
                Expr::pred("Breeze", ["3", "1"])
            )
        );
    }

    #[test]
    fn apply_folds_arithmetic() {
        let mut b = Bindings::new();
        assert!(b.bind("x", "1"));
        assert!(b.bind("y", "0"));
        assert!(!b.bind("x", "2"));

        let e = b.apply(&Expr::or(
            Expr::pred("Pit", ["x+1", "y"]),
            Expr::pred("Pit", ["x", "y-1"]),
        ));
        assert_eq!(
            e,
            Expr::or(Expr::pred("Pit", ["2", "0"]), Expr::pred("Pit", ["1", "-1"]))
        );
    }
}
