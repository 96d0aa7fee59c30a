//! Match engine tests - tap protocol, cascade invariants, power-ups

use aqua_match::core::{
    find_matches, BlockFactory, Grid, MatchEngine, RandomSource, SequenceRng, SimpleRng,
    TapOutcome,
};
use aqua_match::types::{BlockId, PollutantKind, PowerUpKind, GRID_HEIGHT, GRID_WIDTH};

/// Checkerboard-ish rows with no three-in-a-row anywhere
const STRIPES: [&str; 4] = ["pmcpmcpm", "mcpmcpmc", "cpmcpmcp", "pmcpmcpm"];

fn striped() -> (Grid, BlockFactory) {
    let mut factory = BlockFactory::new(20);
    let grid = factory
        .grid_from_rows(GRID_WIDTH, GRID_HEIGHT, &STRIPES)
        .unwrap();
    (grid, factory)
}

fn id_at(grid: &Grid, row: i8, col: i8) -> BlockId {
    grid.block_at(row, col).unwrap().id
}

#[test]
fn test_striped_layout_has_no_matches() {
    let (grid, _) = striped();
    assert!(find_matches(&grid).is_empty());
}

#[test]
fn test_orthogonal_neighbours_swap() {
    let (mut grid, mut factory) = striped();
    let mut engine = MatchEngine::new(GRID_HEIGHT - 1);
    let mut rng = SimpleRng::new(1);
    let a = id_at(&grid, 2, 3);
    let b = id_at(&grid, 2, 4);
    let (kind_a, kind_b) = (grid.find(a).unwrap().kind, grid.find(b).unwrap().kind);

    engine.handle_tap(&mut grid, &mut factory, &mut rng, a).unwrap();
    let outcome = engine.handle_tap(&mut grid, &mut factory, &mut rng, b).unwrap();

    assert!(matches!(outcome, TapOutcome::Swapped { first, second, .. } if first == a && second == b));
    assert_eq!(grid.find(a).unwrap().kind, kind_b);
    assert_eq!(grid.find(b).unwrap().kind, kind_a);
    assert_eq!(engine.selected(), None);
}

#[test]
fn test_diagonal_second_tap_is_a_no_op() {
    let (mut grid, mut factory) = striped();
    let mut engine = MatchEngine::new(GRID_HEIGHT - 1);
    let mut rng = SimpleRng::new(1);
    let before = grid.to_ascii();

    let a = id_at(&grid, 2, 3);
    let diag = id_at(&grid, 3, 4);
    engine.handle_tap(&mut grid, &mut factory, &mut rng, a).unwrap();
    let outcome = engine.handle_tap(&mut grid, &mut factory, &mut rng, diag).unwrap();

    assert_eq!(outcome, TapOutcome::Deselected);
    assert_eq!(grid.to_ascii(), before);
    assert!(grid.blocks().all(|b| !b.selected));
}

#[test]
fn test_stale_selection_restarts_protocol() {
    let mut factory = BlockFactory::new(20);
    let mut grid = factory.grid_from_rows(4, 5, &["pmcp", "mcpm"]).unwrap();
    let mut engine = MatchEngine::new(4);
    let mut rng = SequenceRng::constant(2);

    let a = id_at(&grid, 1, 0);
    engine.handle_tap(&mut grid, &mut factory, &mut rng, a).unwrap();
    // A power-up clears the selected microbe before the second tap.
    engine
        .apply_power_up(&mut grid, &mut factory, &mut rng, PowerUpKind::RoWave, a)
        .unwrap();
    assert!(grid.find(a).is_none());

    let b = id_at(&grid, 0, 1);
    assert_eq!(
        engine.handle_tap(&mut grid, &mut factory, &mut rng, b).unwrap(),
        TapOutcome::Selected(b)
    );
}

#[test]
fn test_random_play_keeps_cascade_invariants() {
    let mut factory = BlockFactory::new(25);
    let mut rng = SimpleRng::new(77);
    let mut grid = Grid::new(GRID_WIDTH, GRID_HEIGHT).unwrap();
    for block in factory.initial_layout(&mut rng, 6, GRID_WIDTH) {
        grid.add(block).unwrap();
    }
    let mut engine = MatchEngine::new(GRID_HEIGHT - 1);
    let mut picker = SimpleRng::new(4242);
    let mut total = 0u32;

    for _ in 0..200 {
        if grid.is_empty() {
            break;
        }
        let ids = grid.ids();
        let Some(&first) = picker.pick(&ids) else {
            break;
        };
        let (row, col) = grid.find(first).unwrap().position();
        let neighbours: Vec<BlockId> = [(1, 0), (-1, 0), (0, 1), (0, -1)]
            .iter()
            .filter_map(|(dr, dc)| grid.block_at(row + dr, col + dc).map(|b| b.id))
            .collect();
        let Some(&second) = picker.pick(&neighbours) else {
            continue;
        };

        engine.handle_tap(&mut grid, &mut factory, &mut rng, first).unwrap();
        let outcome = engine.handle_tap(&mut grid, &mut factory, &mut rng, second).unwrap();
        let TapOutcome::Swapped { report, .. } = outcome else {
            panic!("adjacent tap must swap");
        };

        assert!(report.settled);
        assert!(find_matches(&grid).is_empty(), "grid left with a match");
        assert!(grid.is_compact(), "column with a gap");
        assert_eq!(engine.combo(), 0);
        let step_sum: u32 = report.steps.iter().map(|s| s.score).sum();
        assert_eq!(report.score, step_sum);
        for (i, step) in report.steps.iter().enumerate() {
            assert_eq!(step.combo, i as u32 + 1);
        }

        let next = total + report.score;
        assert!(next >= total);
        total = next;
    }
}

#[test]
fn test_pp_cotton_ignores_other_kinds() {
    let mut factory = BlockFactory::new(20);
    let mut grid = factory.grid_from_rows(3, 4, &["mcm", "cpc", "mcm"]).unwrap();
    let mut engine = MatchEngine::new(3);
    let mut rng = SequenceRng::constant(1);
    let center = id_at(&grid, 1, 1);

    let report = engine
        .apply_power_up(&mut grid, &mut factory, &mut rng, PowerUpKind::PpCotton, center)
        .unwrap();
    assert_eq!(report.cleared.len(), 1);
    assert_eq!(report.cleared[0].kind, PollutantKind::Particle);
    assert_eq!(grid.len(), 9);
}

#[test]
fn test_wider_radius_reaches_further() {
    let mut factory = BlockFactory::new(20);
    let mut grid = factory.grid_from_rows(5, 3, &["ppppp"]).unwrap();
    let mut engine = MatchEngine::new(1).with_powerup_radius(2);
    let mut rng = SequenceRng::constant(1);
    let center = id_at(&grid, 0, 2);

    let report = engine
        .apply_power_up(&mut grid, &mut factory, &mut rng, PowerUpKind::PpCotton, center)
        .unwrap();
    assert_eq!(report.cleared.len(), 5);
    assert!(report.cleared_grid);
}

#[test]
fn test_power_up_does_not_cascade_or_score() {
    let mut factory = BlockFactory::new(20);
    let mut grid = factory.grid_from_rows(3, 4, &["mmc", "ppc"]).unwrap();
    let mut engine = MatchEngine::new(2);
    // Every refilled block is a particle, so row 1 becomes "ppp".
    let mut rng = SequenceRng::constant(0);
    let target = id_at(&grid, 0, 2);

    let report = engine
        .apply_power_up(&mut grid, &mut factory, &mut rng, PowerUpKind::RoWave, target)
        .unwrap();
    assert_eq!(report.cleared.len(), 2);
    // The refill created a particle triple that stays on the grid.
    assert!(!find_matches(&grid).is_empty());
    assert_eq!(engine.combo(), 0);
}
