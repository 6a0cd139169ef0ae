//! Fire propagation from a burning tree
//!
//! On its turn a `Burning` tree:
//! 1. burns out at once if any 8-neighbor is a lake (no spread this turn);
//! 2. otherwise tries to ignite each `Fine` 8-neighbor with the wind-biased
//!    threshold test, and flashes over any intact corridor neighbor;
//! 3. burns out, booking its emission on the ledger.

use crate::core_types::{Connectivity, EntityId, Position};
use crate::grid::GroundKind;
use crate::simulation::context::World;
use crate::simulation::entity::{Entity, GroundCover, GroundEntity};
use rand::Rng;
use rustc_hash::FxHashSet;
use tracing::trace;

/// Per-tick behavior of a burning tree
pub fn step_burning(world: &mut World, id: EntityId, pos: Position) {
    let neighbors = world.grid.moore(pos);

    if neighbors
        .iter()
        .any(|&n| world.ground_kind(n) == Some(GroundKind::Lake))
    {
        trace!(tick = world.tick, %pos, "lake suppression");
        world.counters.lake_suppressed += 1;
        burn_out(world, id);
        return;
    }

    for neighbor in neighbors {
        match world.grid.ground_at(neighbor) {
            Some((tree_id, GroundKind::Vegetation)) => {
                if !world.registry.tree(tree_id).is_some_and(|t| t.is_fine()) {
                    continue;
                }
                let threshold = world.env.ignition_threshold(pos.delta_to(neighbor));
                let draw: f64 = world.rng.random_range(0.0..100.0);
                if draw > *threshold {
                    ignite(world, tree_id);
                }
            }
            Some((corridor_id, GroundKind::Corridor)) => {
                flash_corridor(world, corridor_id);
            }
            Some((_, GroundKind::Bare | GroundKind::Lake | GroundKind::Obstacle)) | None => {}
        }
    }

    burn_out(world, id);
}

/// `Fine -> Burning`
fn ignite(world: &mut World, id: EntityId) -> bool {
    let ignited = world.registry.tree_mut(id).is_some_and(|t| t.ignite());
    if ignited {
        world.counters.ignitions += 1;
    }
    ignited
}

/// `Burning -> Burned` with the emission booked on tree and ledger
fn burn_out(world: &mut World, id: EntityId) {
    let co2_factor = world.env.biome.co2_factor;
    let tick = world.tick;
    if let Some(tree) = world.registry.tree_mut(id) {
        let emission = tree.burn_emission(co2_factor);
        if tree.burn_out(tick, emission) {
            world.ledger.record_emission(emission);
        }
    }
}

/// Burn a corridor and ignite every `Fine` tree within its spread radius.
///
/// Intact corridors inside the radius catch as well and forward in turn.
/// Returns the number of trees ignited.
pub fn flash_corridor(world: &mut World, corridor_id: EntityId) -> usize {
    let mut visited = FxHashSet::default();
    let mut pending = vec![corridor_id];
    visited.insert(corridor_id);
    let mut ignited = 0;

    while let Some(current) = pending.pop() {
        let Some(entity) = world.registry.get_mut(current) else {
            continue;
        };
        let pos = entity.pos();
        let Some(corridor) = entity.as_corridor_mut() else {
            continue;
        };
        if !corridor.burn() {
            continue;
        }
        let radius = corridor.spread_radius;
        world.counters.corridor_flashovers += 1;
        trace!(tick = world.tick, %pos, radius, "corridor flash-over");

        for target in world.grid.neighbors(pos, Connectivity::Moore, radius) {
            match world.grid.ground_at(target) {
                Some((tree_id, GroundKind::Vegetation)) => {
                    if ignite(world, tree_id) {
                        ignited += 1;
                    }
                }
                Some((next, GroundKind::Corridor)) => {
                    let intact = matches!(
                        world.registry.get(next),
                        Some(Entity::Ground(GroundEntity {
                            cover: GroundCover::Corridor(corridor),
                            ..
                        })) if !corridor.is_burned()
                    );
                    if intact && visited.insert(next) {
                        pending.push(next);
                    }
                }
                _ => {}
            }
        }
    }

    ignited
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::core_types::TreeStatus;
    use crate::simulation::Simulation;

    fn blank(width: i32, height: i32) -> Simulation {
        let config = SimulationConfig {
            width,
            height,
            reprod_speed: 0.0,
            ..SimulationConfig::default()
        };
        Simulation::blank(&config).unwrap()
    }

    #[test]
    fn test_lake_neighbor_forces_burnout_without_spread() {
        let mut sim = blank(3, 3);
        sim.add_lake(Position::new(0, 0)).unwrap();
        let burning = sim.add_tree(Position::new(1, 1), TreeStatus::Burning).unwrap();
        for pos in [(2, 2), (1, 2), (2, 1), (0, 1), (1, 0)] {
            sim.add_tree(pos.into(), TreeStatus::Fine).unwrap();
        }

        let pos = Position::new(1, 1);
        step_burning(sim.world_mut(), burning, pos);

        let world = sim.world();
        assert_eq!(world.registry.tree(burning).unwrap().status(), TreeStatus::Burned);
        assert_eq!(world.counters.lake_suppressed, 1);
        for pos in [(2, 2), (1, 2), (2, 1), (0, 1), (1, 0)] {
            assert!(world.is_fine(pos.into()), "{pos:?} should not ignite");
        }
        assert_eq!(world.ledger.burn_events(), 1);
    }

    #[test]
    fn test_certain_ignition_with_zero_threshold() {
        let config = SimulationConfig {
            width: 3,
            height: 3,
            baseline_threshold: 0.0,
            reprod_speed: 0.0,
            ..SimulationConfig::default()
        };
        let mut sim = Simulation::blank(&config).unwrap();
        let center = sim.add_tree(Position::new(1, 1), TreeStatus::Burning).unwrap();
        for y in 0..3 {
            for x in 0..3 {
                if (x, y) != (1, 1) {
                    sim.add_tree(Position::new(x, y), TreeStatus::Fine).unwrap();
                }
            }
        }

        step_burning(sim.world_mut(), center, Position::new(1, 1));
        let counts = sim.snapshot().counts;
        assert_eq!(counts.burning, 8);
        assert_eq!(counts.burned, 1);
    }

    #[test]
    fn test_corridor_chain_reaches_beyond_radius() {
        let mut sim = blank(9, 1);
        sim.add_corridor(Position::new(1, 0)).unwrap();
        sim.add_corridor(Position::new(3, 0)).unwrap();
        let far = sim.add_tree(Position::new(5, 0), TreeStatus::Fine).unwrap();
        let beyond = sim.add_tree(Position::new(8, 0), TreeStatus::Fine).unwrap();

        let first = sim.world().grid.ground_at(Position::new(1, 0)).unwrap().0;
        let ignited = flash_corridor(sim.world_mut(), first);

        let world = sim.world();
        assert_eq!(ignited, 1);
        assert!(world.registry.tree(far).unwrap().is_burning());
        assert!(world.registry.tree(beyond).unwrap().is_fine());
        assert_eq!(world.counters.corridor_flashovers, 2);
    }
}
