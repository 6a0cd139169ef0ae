//! Invariants that hold across whole runs

use approx::assert_relative_eq;
use forest_fire_core::core_types::Offset;
use forest_fire_core::physics::{local_density, step_fine};
use forest_fire_core::weather::cloud::step_cloud;
use forest_fire_core::{
    EntityId, Environment, Fraction, Percent, Position, Simulation, SimulationConfig, TreeStatus,
    Wind, WindDirection,
};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

fn busy_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed,
        width: 40,
        height: 30,
        biome_name: "Cerrado".to_string(),
        wind_direction: "E".to_string(),
        wind_intensity: 0.6,
        baseline_threshold: 40.0,
        rainy_season: true,
        cloud_quantity: 3,
        cloud_step: 4,
        clouds_per_step: 2,
        cloud_speed: 0.5,
        water_density: 0.05,
        num_of_lakes: 2,
        corridor: true,
        corridor_density: 0.02,
        obstacles: true,
        obstacles_density: 0.02,
        fireman_quantity: 3,
        fire_step: 10,
        ..SimulationConfig::default()
    }
}

#[test]
fn test_same_seed_replays_identically() {
    let mut a = Simulation::new(&busy_config(1234)).unwrap();
    let mut b = Simulation::new(&busy_config(1234)).unwrap();
    a.run(40);
    b.run(40);
    assert_eq!(a.history(), b.history());

    let mut c = Simulation::new(&busy_config(4321)).unwrap();
    c.run(40);
    assert_ne!(a.history(), c.history());
}

#[test]
fn test_burned_is_terminal() {
    let mut sim = Simulation::new(&busy_config(9)).unwrap();
    let mut burned: FxHashSet<EntityId> = FxHashSet::default();
    for _ in 0..60 {
        sim.step();
        for &id in &burned {
            // A burned tree is either still burned or gone (cleared or regrown)
            if let Some(tree) = sim.registry().tree(id) {
                assert!(tree.is_burned(), "{id} left the Burned state");
            }
        }
        burned.extend(
            sim.registry()
                .iter()
                .filter(|(_, e)| e.as_tree().is_some_and(|t| t.is_burned()))
                .map(|(id, _)| id),
        );
    }
}

#[test]
fn test_ledger_matches_tree_accumulators() {
    let config = SimulationConfig {
        reprod_speed: 0.0,
        ..busy_config(77)
    };
    let mut sim = Simulation::new(&config).unwrap();
    sim.run(50);

    // Without regrowth nothing is replaced, so every emission is still on a tree
    let on_trees: f64 = sim
        .registry()
        .iter()
        .filter_map(|(_, e)| e.as_tree())
        .map(|t| *t.emitted())
        .sum();
    assert_relative_eq!(*sim.ledger().emitted(), on_trees, max_relative = 1e-9);
    assert_relative_eq!(*sim.ledger().balance(), on_trees, max_relative = 1e-9);
}

#[test]
fn test_lake_neighbor_burns_out_without_spreading() {
    let config = SimulationConfig {
        width: 5,
        height: 5,
        baseline_threshold: 0.0,
        reprod_speed: 0.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::blank(&config).unwrap();
    for pos in sim.grid().positions().collect::<Vec<_>>() {
        sim.add_tree(pos, TreeStatus::Fine).unwrap();
    }
    sim.add_lake(Position::new(0, 0)).unwrap();
    sim.add_tree(Position::new(1, 1), TreeStatus::Burning).unwrap();

    sim.step();

    assert_eq!(sim.tree_at(Position::new(1, 1)).unwrap().status(), TreeStatus::Burned);
    let counts = sim.snapshot().counts;
    assert_eq!(counts.burning, 0);
    assert_eq!(counts.burned, 1);
    assert_eq!(counts.fine, 23);
}

#[test]
fn test_rain_keeps_accumulators() {
    let config = SimulationConfig {
        width: 7,
        height: 7,
        tree_density: 0.9,
        reprod_speed: 100.0,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::blank(&config).unwrap();
    sim.fill_bare().unwrap();
    let center = Position::new(3, 3);
    let id = sim.add_tree(center, TreeStatus::Fine).unwrap();
    step_fine(sim.world_mut(), id, center);

    // Pick a regrown tree, which carries sequestration
    let pos = sim
        .grid()
        .moore(center)
        .into_iter()
        .find(|&p| sim.tree_at(p).is_some())
        .unwrap();
    let before = sim.tree_at(pos).unwrap().clone();
    assert!(*before.sequestered() > 0.0);
    assert!(sim.world_mut().tree_at_mut(pos).unwrap().ignite());

    let cloud = sim.add_cloud(center, 3).unwrap();
    step_cloud(sim.world_mut(), cloud);

    let after = sim.tree_at(pos).unwrap();
    assert!(after.is_fine());
    assert_eq!(after.sequestered(), before.sequestered());
    assert_eq!(after.emitted(), before.emitted());
    assert_eq!(after.times_extinguished(), 1);
    assert_eq!(sim.counters().rain_extinguished, 1);
    assert_eq!(*sim.ledger().emitted(), 0.0);
}

fn moore_offsets() -> impl Strategy<Value = Offset> {
    (-1..=1i32, -1..=1i32)
        .prop_filter("center is not a neighbor", |&(dx, dy)| dx != 0 || dy != 0)
        .prop_map(|(dx, dy)| Offset::new(dx, dy))
}

fn directions() -> impl Strategy<Value = Option<WindDirection>> {
    prop_oneof![
        Just(None),
        Just(Some(WindDirection::North)),
        Just(Some(WindDirection::South)),
        Just(Some(WindDirection::East)),
        Just(Some(WindDirection::West)),
    ]
}

proptest! {
    #[test]
    fn prop_calm_wind_is_symmetric(direction in directions(), a in moore_offsets(), b in moore_offsets()) {
        let env = Environment {
            wind: Wind::new(direction, Fraction::ZERO),
            ..Environment::default()
        };
        prop_assert_eq!(env.ignition_threshold(a), env.ignition_threshold(b));
        prop_assert_eq!(env.ignition_threshold(a), Percent::new(70.0));
    }

    #[test]
    fn prop_wind_orders_thresholds(direction in directions(), intensity in 0.0..=1.0f64, offset in moore_offsets()) {
        let env = Environment {
            wind: Wind::new(direction, Fraction::new(intensity)),
            ..Environment::default()
        };
        if let Some(downwind) = env.wind.vector() {
            prop_assert!(env.ignition_threshold(downwind) <= env.ignition_threshold(offset));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn prop_regrowth_never_exceeds_local_target(
        seed in any::<u64>(),
        target in 0.2..0.8f64,
        speed in 0.5..5.0f64,
    ) {
        let config = SimulationConfig {
            seed,
            width: 20,
            height: 20,
            tree_density: target,
            reprod_speed: speed,
            fire_enabled: false,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        sim.fill_bare().unwrap();
        // Seeds at least five cells apart never share a window
        for y in (0..20).step_by(5) {
            for x in (0..20).step_by(5) {
                sim.add_tree(Position::new(x, y), TreeStatus::Fine).unwrap();
            }
        }

        sim.run(15);

        // The cap holds wherever a tree reads its window
        let trees: Vec<Position> = sim.grid().positions().filter(|&p| sim.world().is_fine(p)).collect();
        prop_assert!(trees.len() > 16, "nothing regrew");
        for pos in trees {
            let (fine, total) = local_density(sim.world(), pos);
            prop_assert!(
                fine as f64 / total as f64 <= target + 1e-9,
                "{} has {}/{} fine, target {}", pos, fine, total, target
            );
        }
    }
}
