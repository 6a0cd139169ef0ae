//! Random-activation scheduler
//!
//! One tick visits every entity that was alive when the tick began, once,
//! in an order shuffled from the shared RNG. Behaviors see the grid as
//! earlier turns left it. Entities created during the tick wait for the next
//! one; entities removed before their turn are skipped.

use crate::config::IgnitionMode;
use crate::core_types::{EntityId, Position, TreeStatus};
use crate::physics::{step_burning, step_fine};
use crate::simulation::context::World;
use crate::simulation::entity::{Entity, GroundCover, GroundEntity};
use crate::simulation::ignition::ignition_points;
use crate::suppression::step_firefighter;
use crate::weather::cloud::{inject_clouds, step_cloud};
use rand::seq::SliceRandom;
use tracing::{debug, trace};

/// What an entity does on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Burn(Position),
    Regrow(Position),
    Cloud,
    Firefighter,
    Idle,
}

fn turn_of(entity: &Entity) -> Turn {
    match entity {
        Entity::Ground(GroundEntity {
            pos,
            cover: GroundCover::Vegetation(tree),
        }) => match tree.status() {
            TreeStatus::Burning => Turn::Burn(*pos),
            TreeStatus::Fine => Turn::Regrow(*pos),
            TreeStatus::Burned => Turn::Idle,
        },
        Entity::Ground(GroundEntity {
            cover: GroundCover::Bare | GroundCover::Lake | GroundCover::Corridor(_) | GroundCover::Obstacle,
            ..
        }) => Turn::Idle,
        Entity::Cloud(_) => Turn::Cloud,
        Entity::Firefighter(_) => Turn::Firefighter,
    }
}

/// Run the turn of `id` against the current world state
fn visit(world: &mut World, id: EntityId) {
    let Some(entity) = world.registry.get(id) else {
        return;
    };
    match turn_of(entity) {
        Turn::Burn(pos) => step_burning(world, id, pos),
        Turn::Regrow(pos) => step_fine(world, id, pos),
        Turn::Cloud => step_cloud(world, id),
        Turn::Firefighter => step_firefighter(world, id),
        Turn::Idle => {}
    }
}

/// Advance the world by one tick
pub fn run_tick(world: &mut World) {
    world.tick += 1;

    let mut order = world.registry.ids();
    order.shuffle(&mut world.rng);
    for id in order {
        visit(world, id);
    }

    environment_hooks(world);
}

/// Scheduled cloud injection and periodic re-ignition
fn environment_hooks(world: &mut World) {
    let due = world.env.rain.clouds_due(world.tick);
    if due > 0 {
        let placed = inject_clouds(world, due);
        debug!(tick = world.tick, placed, "scheduled clouds");
    }

    if world.env.fire_due(world.tick) {
        let (width, height) = (world.grid.width(), world.grid.height());
        let points = ignition_points(IgnitionMode::Random, width, height, &mut world.rng);
        let mut sorted: Vec<Position> = points.into_iter().collect();
        sorted.sort_unstable_by_key(|p| (p.y, p.x));

        let mut ignited = 0;
        for pos in sorted {
            if world.tree_at_mut(pos).is_some_and(|tree| tree.ignite()) {
                world.counters.ignitions += 1;
                ignited += 1;
                trace!(tick = world.tick, %pos, "scheduled ignition");
            }
        }
        debug!(tick = world.tick, ignited, "scheduled fire start");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::simulation::Simulation;

    #[test]
    fn test_tree_grown_mid_tick_waits_for_next_tick() {
        // One row: the center reaches x = 1..=5, only a new tree could reach the ends
        let config = SimulationConfig {
            width: 7,
            height: 1,
            tree_density: 1.0,
            reprod_speed: 1000.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        sim.fill_bare().unwrap();
        sim.add_tree(Position::new(3, 0), TreeStatus::Fine).unwrap();

        run_tick(sim.world_mut());
        assert_eq!(sim.snapshot().counts.fine, 5);
        assert!(!sim.world().is_fine(Position::new(0, 0)));
        assert!(!sim.world().is_fine(Position::new(6, 0)));

        run_tick(sim.world_mut());
        assert_eq!(sim.snapshot().counts.fine, 7);
    }

    #[test]
    fn test_absorbed_cloud_loses_its_turn() {
        let config = SimulationConfig {
            width: 10,
            height: 10,
            cloud_speed: 0.1,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        let survivor = sim.add_cloud(Position::new(4, 4), 2).unwrap();
        let absorbed = sim.add_cloud(Position::new(5, 4), 3).unwrap();

        visit(sim.world_mut(), survivor);
        assert!(!sim.world().registry.contains(absorbed));

        // A live cloud draws from the stream on its turn; a removed one does not
        let before = sim.world().rng.get_word_pos();
        visit(sim.world_mut(), absorbed);
        assert_eq!(sim.world().rng.get_word_pos(), before);
        visit(sim.world_mut(), survivor);
        assert_ne!(sim.world().rng.get_word_pos(), before);
    }

    #[test]
    fn test_tick_with_adjacent_clouds_leaves_one() {
        let config = SimulationConfig {
            width: 10,
            height: 10,
            cloud_speed: 0.1,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        sim.add_cloud(Position::new(4, 4), 2).unwrap();
        sim.add_cloud(Position::new(5, 4), 3).unwrap();

        run_tick(sim.world_mut());

        let counts = sim.snapshot().counts;
        assert_eq!(counts.clouds, 1);
        assert_eq!(sim.counters().cloud_merges, 1);
        let (_, cloud) = sim.registry().iter().find(|(_, e)| e.as_cloud().is_some()).unwrap();
        assert_eq!(cloud.as_cloud().unwrap().size, 5);
    }

    #[test]
    fn test_scheduled_reignition() {
        let config = SimulationConfig {
            width: 4,
            height: 4,
            fire_step: 1,
            reprod_speed: 0.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        for pos in sim.world().grid.positions().collect::<Vec<_>>() {
            sim.add_tree(pos, TreeStatus::Fine).unwrap();
        }
        run_tick(sim.world_mut());
        assert!(sim.snapshot().counts.burning > 0);
    }
}
