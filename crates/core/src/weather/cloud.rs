//! Rain clouds
//!
//! Clouds are aerial: they share cells with any ground occupant. Each turn a
//! cloud leaves the map if it sits on the border, otherwise it drifts, rains
//! on every cell within `size + 3` (Chebyshev) and absorbs adjacent clouds.
//!
//! Drift keeps an exact `f64` position so sub-cell speeds accumulate; the
//! grid position is that value rounded.

use crate::core_types::{Connectivity, EntityId, Offset, Position};
use crate::error::Result;
use crate::grid::AerialKind;
use crate::simulation::context::World;
use crate::simulation::entity::Entity;
use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Extra Chebyshev reach of rain beyond the cloud size
pub const RAIN_RADIUS_MARGIN: i32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Position,
    pub size: u32,
    /// Drift direction, each axis in `[-1, 1]`
    pub direction: Offset,
    /// Cells per tick
    pub speed: f64,
    /// Size reached the rain trigger threshold
    pub full: bool,
    exact: Vector2<f64>,
}

impl Cloud {
    pub fn new(pos: Position, size: u32, direction: Offset, speed: f64, rain_trigger_size: u32) -> Self {
        Cloud {
            pos,
            size,
            direction: clamp_direction(direction),
            speed,
            full: size >= rain_trigger_size,
            exact: Vector2::new(f64::from(pos.x), f64::from(pos.y)),
        }
    }

    /// Chebyshev radius of the rain footprint
    #[inline]
    pub fn rain_radius(&self) -> i32 {
        i32::try_from(self.size)
            .unwrap_or(i32::MAX - RAIN_RADIUS_MARGIN)
            .saturating_add(RAIN_RADIUS_MARGIN)
    }

    /// Next exact position and its rounded grid cell
    fn drift(&self) -> (Vector2<f64>, Position) {
        let step = Vector2::new(f64::from(self.direction.x), f64::from(self.direction.y)) * self.speed;
        let exact = self.exact + step;
        // Saturating casts; anything that far out is off-grid anyway
        let pos = Position::new(exact.x.round() as i32, exact.y.round() as i32);
        (exact, pos)
    }
}

fn clamp_direction(direction: Offset) -> Offset {
    direction.map(|axis| axis.clamp(-1, 1))
}

/// Spawn a cloud at `pos`.
///
/// Direction follows the wind when there is one, otherwise it is random.
pub fn spawn_cloud(world: &mut World, pos: Position, size: u32) -> Result<EntityId> {
    let direction = match world.env.wind.vector() {
        Some(vector) => vector,
        None => Offset::new(
            world.rng.random_range(-1..=1),
            world.rng.random_range(-1..=1),
        ),
    };
    let rain = world.env.rain;
    world.spawn(Entity::Cloud(Cloud::new(
        pos,
        size,
        direction,
        rain.cloud_speed,
        rain.rain_trigger_size,
    )))
}

/// Spawn `count` clouds at random positions with random sizes in
/// `1..=clouds_size`. Returns how many were placed.
///
/// A draw that lands on a cell at aerial capacity is skipped.
pub fn inject_clouds(world: &mut World, count: u32) -> u32 {
    let max_size = world.env.rain.clouds_size.max(1);
    let mut placed = 0;
    for _ in 0..count {
        let pos = Position::new(
            world.rng.random_range(0..world.grid.width()),
            world.rng.random_range(0..world.grid.height()),
        );
        let size = world.rng.random_range(1..=max_size);
        match spawn_cloud(world, pos, size) {
            Ok(_) => placed += 1,
            Err(err) => debug!(%pos, %err, "cloud injection skipped"),
        }
    }
    placed
}

/// Per-tick behavior of a cloud
pub fn step_cloud(world: &mut World, id: EntityId) {
    let Some(cloud) = world.registry.get(id).and_then(Entity::as_cloud).cloned() else {
        return;
    };

    if world.grid.is_on_border(cloud.pos) {
        world.despawn(id);
        world.counters.clouds_exited += 1;
        trace!(tick = world.tick, pos = %cloud.pos, "cloud left the grid");
        return;
    }

    let Some(pos) = drift(world, id) else {
        return;
    };
    perturb_direction(world, id, cloud.direction);

    rain(world, pos, cloud.rain_radius());
    absorb_neighbors(world, id, pos);
}

/// Occasionally nudge the heading used by the next drift
fn perturb_direction(world: &mut World, id: EntityId, direction: Offset) {
    if !world.rng.random_bool(world.env.rain.direction_change_rate.clamp(0.0, 1.0)) {
        return;
    }
    let nudge = Offset::new(
        world.rng.random_range(-1..=1),
        world.rng.random_range(-1..=1),
    );
    if let Some(stored) = world.registry.get_mut(id).and_then(Entity::as_cloud_mut) {
        stored.direction = clamp_direction(direction + nudge);
    }
}

/// Move the cloud one drift step. `None` if it drifted off the grid.
///
/// A move into a cell at aerial capacity is refused and the cloud keeps both
/// its cell and its exact position.
fn drift(world: &mut World, id: EntityId) -> Option<Position> {
    let cloud = world.registry.get(id).and_then(Entity::as_cloud)?;
    let from = cloud.pos;
    let (exact, to) = cloud.drift();

    if !world.grid.in_bounds(to) {
        world.despawn(id);
        world.counters.clouds_exited += 1;
        return None;
    }
    if to != from && world.move_aerial(id, to).is_err() {
        return Some(from);
    }
    if let Some(stored) = world.registry.get_mut(id).and_then(Entity::as_cloud_mut) {
        stored.exact = exact;
    }
    Some(to)
}

/// Put out every burning tree within `radius` of `center`, center included
fn rain(world: &mut World, center: Position, radius: i32) {
    let mut cells = world.grid.neighbors(center, Connectivity::Moore, radius);
    cells.push(center);
    for cell in cells {
        if world.extinguish_at(cell) {
            world.counters.rain_extinguished += 1;
            trace!(tick = world.tick, %cell, "rain extinguished");
        }
    }
}

/// Merge clouds sharing the cell or any 8-neighbor into `id`
fn absorb_neighbors(world: &mut World, id: EntityId, pos: Position) {
    let mut cells = world.grid.moore(pos);
    cells.push(pos);

    let others: Vec<EntityId> = cells
        .iter()
        .flat_map(|&cell| world.grid.aerial_at(cell).to_vec())
        .filter(|&(other, kind)| kind == AerialKind::Cloud && other != id)
        .map(|(other, _)| other)
        .collect();

    let trigger = world.env.rain.rain_trigger_size;
    for other in others {
        let Some(Entity::Cloud(absorbed)) = world.despawn(other) else {
            continue;
        };
        if let Some(cloud) = world.registry.get_mut(id).and_then(Entity::as_cloud_mut) {
            cloud.size = cloud.size.saturating_add(absorbed.size);
            cloud.full = cloud.size >= trigger;
        }
        world.counters.cloud_merges += 1;
        trace!(tick = world.tick, %pos, absorbed = %other, "cloud merge");
    }
}
