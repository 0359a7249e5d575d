use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wumpus_core::{Coord, Direction};
use wumpus_nav::PlanningModule;

fn serpentine(size: i32) -> PlanningModule {
    let mut planner = PlanningModule::new();
    for y in 0..size {
        for x in 0..size {
            // Walls on odd rows with a gap alternating between the two ends.
            let gap = if y % 4 == 1 { size - 1 } else { 0 };
            let wall = y % 2 == 1 && x != gap;
            if !wall {
                planner.add_safe_cell(Coord::new(x, y));
            }
        }
    }
    planner
}

fn bench_route(c: &mut Criterion) {
    let mut group = c.benchmark_group("wumpus-nav/route");

    let planner = serpentine(32);
    let goal = Coord::new(0, 30);
    group.bench_function("serpentine_32", |b| {
        b.iter(|| {
            let route = planner
                .find_route(Coord::ORIGIN, goal, Direction::East)
                .expect("route");
            black_box(route.cost);
        })
    });

    let open = serpentine(1);
    group.bench_function("trivial", |b| {
        b.iter(|| black_box(open.find_route(Coord::ORIGIN, Coord::ORIGIN, Direction::East)))
    });

    group.finish();
}

criterion_group!(benches, bench_route);
criterion_main!(benches);
