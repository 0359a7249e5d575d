use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wumpus_logic::{Expr, InferenceConfig, InferenceEngine, KnowledgeBase};

fn breeze_kb(breezes: &[(i32, i32)]) -> KnowledgeBase {
    let mut kb = KnowledgeBase::new();
    for (x, y) in breezes {
        kb.add_fact(Expr::pred("Breeze", [x.to_string(), y.to_string()]));
    }
    kb.add_rule(Expr::implies(
        Expr::pred("Breeze", ["x", "y"]),
        Expr::any([
            Expr::pred("Pit", ["x+1", "y"]),
            Expr::pred("Pit", ["x-1", "y"]),
            Expr::pred("Pit", ["x", "y+1"]),
            Expr::pred("Pit", ["x", "y-1"]),
        ]),
    ));
    kb
}

fn bench_model_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("wumpus-logic/model_check");

    let single = breeze_kb(&[(1, 1)]);
    let query = Expr::pred("Pit", ["1", "2"]);
    group.bench_function("single_breeze", |b| {
        let engine = InferenceEngine::new(&single);
        b.iter(|| black_box(engine.model_check_probability(black_box(&query))))
    });

    let spread = breeze_kb(&[(1, 0), (0, 1), (2, 1), (4, 4)]);
    let query = Expr::pred("Pit", ["1", "1"]);
    for (label, pruning) in [("spread_full", false), ("spread_pruned", true)] {
        let engine = InferenceEngine::new(&spread).with_config(InferenceConfig {
            relevance_pruning: pruning,
            ..InferenceConfig::default()
        });
        group.bench_function(label, |b| {
            b.iter(|| black_box(engine.model_check_probability(black_box(&query))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_model_check);
criterion_main!(benches);
