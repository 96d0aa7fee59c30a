use criterion::{black_box, criterion_group, criterion_main, Criterion};
use aqua_match::core::{find_matches, BlockFactory, Grid, MatchEngine, SimpleRng};
use aqua_match::engine::{GameSession, SessionConfig};
use aqua_match::types::{GRID_HEIGHT, GRID_WIDTH};

fn seeded_grid(level: u32, seed: u32) -> (Grid, BlockFactory, SimpleRng) {
    let mut factory = BlockFactory::new(level);
    let mut rng = SimpleRng::new(seed);
    let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
    factory.refill(&mut grid, &mut rng, GRID_HEIGHT - 1).unwrap();
    (grid, factory, rng)
}

fn bench_find_matches(c: &mut Criterion) {
    let (grid, _, _) = seeded_grid(20, 12345);

    c.bench_function("find_matches_full_grid", |b| {
        b.iter(|| black_box(find_matches(black_box(&grid))))
    });
}

fn bench_resolve(c: &mut Criterion) {
    let mut engine = MatchEngine::new(GRID_HEIGHT - 1);

    c.bench_function("resolve_random_grid", |b| {
        b.iter(|| {
            let (mut grid, mut factory, mut rng) = seeded_grid(20, 777);
            let report = engine.resolve(&mut grid, &mut factory, &mut rng).unwrap();
            black_box(report.score)
        })
    });
}

fn bench_session_tick(c: &mut Criterion) {
    let mut session = GameSession::seeded(SessionConfig::default(), 12345).unwrap();
    session.init_level(1).unwrap();

    c.bench_function("session_tick_zero", |b| {
        b.iter(|| session.tick(black_box(0)))
    });
}

criterion_group!(benches, bench_find_matches, bench_resolve, bench_session_tick);
criterion_main!(benches);
