use wumpus_logic::{Expr, KnowledgeBase, LoadReport, LogicError};

fn breeze_rule() -> Expr {
    Expr::implies(
        Expr::pred("Breeze", ["x", "y"]),
        Expr::or(Expr::pred("Pit", ["x+1", "y"]), Expr::pred("Pit", ["x", "y+1"])),
    )
}

#[test]
fn facts_and_rules_are_deduplicated_in_order() {
    let mut kb = KnowledgeBase::new();
    assert!(kb.is_empty());

    assert!(kb.add_fact(Expr::pred("Breeze", ["1", "1"])));
    assert!(kb.add_fact(Expr::not(Expr::pred("Stench", ["1", "1"]))));
    assert!(!kb.add_fact(Expr::pred("Breeze", ["1", "1"])));
    assert!(!kb.update_kb(Expr::pred("Breeze", ["1", "1"])));
    assert!(kb.update_kb(Expr::pred("Glitter", ["0", "0"])));

    assert!(kb.add_rule(breeze_rule()));
    assert!(!kb.add_rule(breeze_rule()));

    assert_eq!(
        kb.facts(),
        &[
            Expr::pred("Breeze", ["1", "1"]),
            Expr::not(Expr::pred("Stench", ["1", "1"])),
            Expr::pred("Glitter", ["0", "0"]),
        ]
    );
    assert_eq!(kb.rules().len(), 1);
    assert_eq!(kb.len(), 4);
    assert!(kb.contains_fact(&Expr::pred("Glitter", ["0", "0"])));
    assert!(!kb.contains_fact(&Expr::pred("Stench", ["1", "1"])));
}

#[test]
fn flatten_rule_symbols_lists_unique_leaves() {
    let mut kb = KnowledgeBase::new();
    kb.add_rule(breeze_rule());
    kb.add_rule(Expr::implies(
        Expr::pred("Stench", ["x", "y"]),
        Expr::pred("Pit", ["x+1", "y"]),
    ));

    assert_eq!(
        kb.flatten_rule_symbols(),
        vec![
            Expr::pred("Breeze", ["x", "y"]),
            Expr::pred("Pit", ["x+1", "y"]),
            Expr::pred("Pit", ["x", "y+1"]),
            Expr::pred("Stench", ["x", "y"]),
        ]
    );
}

#[test]
fn bulk_load_reports_duplicates() {
    let mut kb = KnowledgeBase::new();
    let report = kb.extend_facts([
        Expr::pred("Breeze", ["1", "0"]),
        Expr::pred("Breeze", ["0", "1"]),
        Expr::pred("Breeze", ["1", "0"]),
    ]);
    assert_eq!(
        report,
        LoadReport {
            added: 2,
            duplicates: 1,
            skipped: 0
        }
    );
}

#[test]
fn json_load_skips_malformed_entries() {
    let good = serde_json::to_value(Expr::pred("Breeze", ["1", "1"])).unwrap();
    let rule = serde_json::to_value(breeze_rule()).unwrap();
    let facts = serde_json::json!([good, { "Bogus": 1 }, good]).to_string();
    let rules = serde_json::json!([rule, 42]).to_string();

    let mut kb = KnowledgeBase::new();
    let fact_report = kb.extend_facts_json(&facts).unwrap();
    let rule_report = kb.extend_rules_json(&rules).unwrap();

    assert_eq!(
        fact_report,
        LoadReport {
            added: 1,
            duplicates: 1,
            skipped: 1
        }
    );
    assert_eq!(rule_report.added, 1);
    assert_eq!(rule_report.skipped, 1);
    assert_eq!(kb.rules(), &[breeze_rule()]);
}

#[test]
fn json_load_rejects_non_arrays() {
    let mut kb = KnowledgeBase::new();
    let err = kb.extend_facts_json(r#"{"facts": []}"#).unwrap_err();
    assert!(matches!(err, LogicError::NotAnArray { kind: "facts" }));

    let err = kb.extend_rules_json("not json").unwrap_err();
    assert!(matches!(err, LogicError::Serialization(_)));
    assert!(kb.is_empty());
}

#[test]
fn knowledge_base_serializes() {
    let mut kb = KnowledgeBase::new();
    kb.add_fact(Expr::pred("Breeze", ["1", "1"]));
    kb.add_rule(breeze_rule());

    let json = serde_json::to_string(&kb).unwrap();
    let back: KnowledgeBase = serde_json::from_str(&json).unwrap();
    assert_eq!(kb, back);
}
