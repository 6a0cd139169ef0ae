//! End-to-end fire and regrowth scenarios

use forest_fire_core::physics::step_burning;
use forest_fire_core::{Position, Simulation, SimulationConfig, TreeStatus};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn config(width: i32, height: i32) -> SimulationConfig {
    SimulationConfig {
        width,
        height,
        reprod_speed: 0.0,
        ..SimulationConfig::default()
    }
}

fn forest(config: &SimulationConfig) -> Simulation {
    let mut sim = Simulation::blank(config).unwrap();
    let positions: Vec<Position> = sim.grid().positions().collect();
    for pos in positions {
        sim.add_tree(pos, TreeStatus::Fine).unwrap();
    }
    sim
}

/// Full forest, one ignition in the corner, calm wind, nothing to stop it.
/// The baseline threshold is zero so every neighbor of a burning tree ignites.
#[test]
fn test_unobstructed_fire_burns_everything() {
    init_logging();
    let config = SimulationConfig {
        baseline_threshold: 0.0,
        ..config(10, 10)
    };
    let mut sim = forest(&config);
    sim.add_tree(Position::new(0, 0), TreeStatus::Burning).unwrap();

    let ran = sim.run_until_fire_out(200);
    assert!(ran < 200, "fire never went out");

    let last = sim.snapshot().counts;
    assert_eq!(last.burned, 100);
    assert_eq!(last.fine, 0);

    let history = sim.history();
    let fine_gone = history.iter().position(|s| s.counts.fine == 0).unwrap();
    let all_burned = history.iter().position(|s| s.counts.burned == 100).unwrap();
    assert!(fine_gone <= all_burned);

    // Emission is monotone and matches the ledger
    assert!(history.windows(2).all(|w| w[0].emitted <= w[1].emitted));
    assert_eq!(sim.ledger().burn_events(), 100);
}

#[test]
fn test_lake_column_stops_the_front() {
    let config = SimulationConfig {
        baseline_threshold: 0.0,
        ..config(9, 6)
    };
    let mut sim = forest(&config);
    for y in 0..6 {
        sim.add_lake(Position::new(4, y)).unwrap();
        sim.add_tree(Position::new(0, y), TreeStatus::Burning).unwrap();
    }

    let east: Vec<Position> = (5..9)
        .flat_map(|x| (0..6).map(move |y| Position::new(x, y)))
        .collect();
    for _ in 0..30 {
        sim.step();
        for &pos in &east {
            let tree = sim.tree_at(pos).unwrap();
            assert!(tree.is_fine(), "{pos} caught fire at tick {}", sim.tick());
        }
    }
    assert!(sim.is_fire_out());
    assert!(sim.counters().lake_suppressed > 0);
}

#[test]
fn test_corridor_ignites_its_radius_in_one_turn() {
    let config = SimulationConfig {
        // No probabilistic ignition can ever succeed
        baseline_threshold: 100.0,
        downwind_threshold: 100.0,
        corridor_spread_radius: 3,
        ..config(11, 11)
    };
    let mut sim = forest(&config);
    let corridor = Position::new(5, 5);
    sim.add_corridor(corridor).unwrap();
    let source = Position::new(4, 5);
    let id = sim.add_tree(source, TreeStatus::Burning).unwrap();

    step_burning(sim.world_mut(), id, source);

    for pos in sim.grid().positions().collect::<Vec<_>>() {
        if pos == corridor || pos == source {
            continue;
        }
        let tree = sim.tree_at(pos).unwrap();
        if pos.chebyshev(corridor) <= 3 {
            assert!(tree.is_burning(), "{pos} inside the radius did not ignite");
        } else {
            assert!(tree.is_fine(), "{pos} outside the radius ignited");
        }
    }
    assert_eq!(sim.counters().corridor_flashovers, 1);
    assert_eq!(sim.snapshot().counts.burned_corridors, 1);
}

#[test]
fn test_regrowth_without_fire_holds_density() {
    init_logging();
    let config = SimulationConfig {
        width: 50,
        height: 50,
        tree_density: 0.5,
        fire_enabled: false,
        reprod_speed: 1.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(&config).unwrap();
    let area = 2500.0;

    let mut previous = sim.snapshot().counts.fine;
    for _ in 0..200 {
        let counts = sim.step().counts;
        assert_eq!(counts.burning, 0);
        assert_eq!(counts.burned, 0);
        assert!(counts.fine >= previous, "no fire, so nothing may die");
        assert!((counts.fine as f64) / area < 0.58, "runaway overgrowth");
        previous = counts.fine;
    }

    let fraction = previous as f64 / area;
    assert!((fraction - 0.5).abs() < 0.08, "fine fraction {fraction}");
}

/// Starting from one seed tree every five cells, regrowth alone fills the
/// grid up to a plateau just under the density target and stays there.
#[test]
fn test_regrowth_from_sparse_seeds_settles_near_target() {
    init_logging();
    let config = SimulationConfig {
        width: 50,
        height: 50,
        tree_density: 0.5,
        fire_enabled: false,
        reprod_speed: 1.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::blank(&config).unwrap();
    sim.fill_bare().unwrap();
    for y in (0..50).step_by(5) {
        for x in (0..50).step_by(5) {
            sim.add_tree(Position::new(x, y), TreeStatus::Fine).unwrap();
        }
    }
    let area = 2500.0;

    sim.run(100);
    let midway = sim.snapshot().counts.fine as f64 / area;
    sim.run(100);
    let settled = sim.snapshot().counts.fine as f64 / area;

    assert!(settled >= midway);
    assert!(settled - midway < 0.02, "still growing: {midway} -> {settled}");
    assert!((settled - 0.5).abs() < 0.08, "settled at {settled}");
    assert!(settled < 0.55, "overshot to {settled}");
}
