//! Density-controlled regrowth
//!
//! Every `Fine` tree samples its two neighbor rings (the 8-neighbors and the
//! fixed distance-2 ring). While the observed fraction of `Fine` trees there
//! is under the biome density target, it seeds bare or burned cells in both
//! rings with a probability proportional to the deficit.
//!
//! Growth is vetoed per cell when the candidate's own window is already past
//! the target, or when the new tree would lift the window of any `Fine` tree
//! around it past the target. Windows are only read from `Fine` trees, so
//! those are the windows the cap holds; bare or burned cells may sit in a
//! denser neighborhood.

use crate::core_types::{EntityId, Position, Tree};
use crate::grid::GroundKind;
use crate::simulation::context::World;
use crate::simulation::entity::GroundCover;
use rand::Rng;
use tracing::{trace, warn};

/// Slack on density comparisons
const DENSITY_EPSILON: f64 = 1e-9;

/// Both regrowth rings of `pos`, first ring first
fn window(world: &World, pos: Position) -> (Vec<Position>, Vec<Position>) {
    (world.grid.moore(pos), world.grid.ring_two(pos))
}

fn fine_count(world: &World, cells: &[Position]) -> usize {
    cells.iter().filter(|&&p| world.is_fine(p)).count()
}

/// `(fine, total)` over both rings of `pos`
pub fn local_density(world: &World, pos: Position) -> (usize, usize) {
    let (ring1, ring2) = window(world, pos);
    (
        fine_count(world, &ring1) + fine_count(world, &ring2),
        ring1.len() + ring2.len(),
    )
}

/// Whether a new `Fine` tree at `pos` keeps its own window and the window of
/// every `Fine` tree that would see it within `target`.
///
/// Ring membership is symmetric, so the trees whose windows contain `pos` are
/// the trees in its own rings.
pub fn can_grow(world: &World, pos: Position, target: f64) -> bool {
    let (fine, total) = local_density(world, pos);
    if total == 0 || fine as f64 / total as f64 > target + DENSITY_EPSILON {
        return false;
    }
    let (ring1, ring2) = window(world, pos);
    ring1
        .into_iter()
        .chain(ring2)
        .filter(|&q| world.is_fine(q))
        .all(|q| {
            let (fine, total) = local_density(world, q);
            (fine + 1) as f64 / total as f64 <= target + DENSITY_EPSILON
        })
}

/// Regrowth turn of the `Fine` tree at `pos`
pub fn step_fine(world: &mut World, _id: EntityId, pos: Position) {
    let speed = world.env.regrowth_speed;
    if speed <= 0.0 {
        return;
    }
    let target = *world.env.density_target();

    let (ring1, ring2) = window(world, pos);
    let total = ring1.len() + ring2.len();
    if total == 0 {
        return;
    }
    let fine = fine_count(world, &ring1) + fine_count(world, &ring2);
    if fine as f64 / total as f64 >= target {
        return;
    }

    let deficit = target * total as f64 - fine as f64;
    let ring_probability = |ring_len: usize| {
        if ring_len == 0 {
            0.0
        } else {
            (speed * deficit / (ring_len * total) as f64).min(1.0)
        }
    };
    let p1 = ring_probability(ring1.len());
    let p2 = ring_probability(ring2.len());

    for (cell, p) in ring1
        .into_iter()
        .map(|c| (c, p1))
        .chain(ring2.into_iter().map(|c| (c, p2)))
    {
        reseed(world, cell, p, target);
    }
}

/// Candidate cell of a regrowth draw
enum Seedbed {
    Bare,
    /// Burned vegetation and the tick it burned out
    Burned(Option<u64>),
}

fn seedbed(world: &World, pos: Position) -> Option<Seedbed> {
    match world.grid.ground_at(pos)? {
        (_, GroundKind::Bare) => Some(Seedbed::Bare),
        (id, GroundKind::Vegetation) => {
            let tree = world.registry.tree(id)?;
            tree.is_burned().then(|| Seedbed::Burned(tree.burned_at()))
        }
        (_, GroundKind::Lake | GroundKind::Corridor | GroundKind::Obstacle) => None,
    }
}

fn reseed(world: &mut World, pos: Position, probability: f64, target: f64) {
    let Some(bed) = seedbed(world, pos) else {
        return;
    };
    let selected = world.rng.random::<f64>() < probability;

    if selected && can_grow(world, pos, target) {
        grow(world, pos);
        return;
    }

    // Burned trees linger one tick before clearing to bare ground
    if let Seedbed::Burned(Some(burned_at)) = bed {
        if burned_at < world.tick {
            match world.replace_ground(pos, GroundCover::Bare) {
                Ok(_) => world.counters.burned_cleared += 1,
                Err(err) => warn!(%pos, %err, "failed to clear burned tree"),
            }
        }
    }
}

fn grow(world: &mut World, pos: Position) {
    let size = world.env.biome.canopy_size.sample(&mut world.rng);
    let mut tree = Tree::new(size, world.env.biome.color.clone());
    let uptake = tree.record_sequestration();
    match world.replace_ground(pos, GroundCover::Vegetation(tree)) {
        Ok(_) => {
            world.ledger.record_sequestration(uptake);
            trace!(tick = world.tick, %pos, size, "regrowth");
        }
        Err(err) => warn!(%pos, %err, "failed to grow tree"),
    }
}
