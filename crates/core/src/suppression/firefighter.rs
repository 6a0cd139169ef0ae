//! Ground crews ("firemen")
//!
//! A firefighter is aerial in the occupancy sense: it stands on a cell
//! without displacing its ground occupant. It lives for the whole run.

use crate::core_types::{EntityId, Position};
use crate::grid::GroundKind;
use crate::simulation::context::World;
use crate::simulation::entity::Entity;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Firefighter {
    pub pos: Position,
}

impl Firefighter {
    pub fn new(pos: Position) -> Self {
        Firefighter { pos }
    }
}

/// Ground a firefighter may walk onto
#[inline]
fn walkable(kind: Option<GroundKind>) -> bool {
    matches!(kind, Some(GroundKind::Bare | GroundKind::Vegetation))
}

fn extinguish(world: &mut World, pos: Position) {
    if world.extinguish_at(pos) {
        world.counters.firefighter_extinguished += 1;
        trace!(tick = world.tick, %pos, "firefighter extinguished");
    }
}

/// Per-tick behavior of a firefighter.
///
/// Puts out its own cell, then steps onto the first burning 8-neighbor it
/// can enter and puts that out too. Fires in cells at aerial capacity are
/// out of reach; if every burning neighbor is, the firefighter holds its
/// ground. With nothing burning nearby it wanders to a random bare or
/// vegetated neighbor.
pub fn step_firefighter(world: &mut World, id: EntityId) {
    let Some(Entity::Firefighter(firefighter)) = world.registry.get(id) else {
        return;
    };
    let pos = firefighter.pos;

    extinguish(world, pos);

    let neighbors = world.grid.moore(pos);
    let burning: Vec<Position> = neighbors
        .iter()
        .copied()
        .filter(|&n| world.tree_at(n).is_some_and(|(_, tree)| tree.is_burning()))
        .collect();

    if !burning.is_empty() {
        for target in burning {
            match world.move_aerial(id, target) {
                Ok(()) => {
                    extinguish(world, target);
                    return;
                }
                Err(err) => trace!(tick = world.tick, %target, %err, "burning cell out of reach"),
            }
        }
        return;
    }

    let open: Vec<Position> = neighbors
        .into_iter()
        .filter(|&n| walkable(world.ground_kind(n)))
        .collect();
    if let Some(&next) = open.choose(&mut world.rng) {
        if let Err(err) = world.move_aerial(id, next) {
            trace!(tick = world.tick, %next, %err, "firefighter stayed put");
        }
    }
}
