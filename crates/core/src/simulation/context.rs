//! Mutable world context handed to every entity behavior
//!
//! Bundles the grid, the registry, the RNG stream, the CO2 ledger, event
//! counters and the read-only environment, so behaviors never reach for
//! ambient state.

use crate::core_types::{EntityId, Position, Tree};
use crate::error::{Result, SimError};
use crate::grid::{Grid, GroundKind};
use crate::metrics::{Co2Ledger, EventCounters};
use crate::simulation::entity::{Entity, GroundCover};
use crate::simulation::registry::Registry;
use crate::weather::Environment;
use rand_chacha::ChaCha8Rng;

pub struct World {
    pub grid: Grid,
    pub registry: Registry,
    /// Single shared stream; draw order is part of the replay contract
    pub rng: ChaCha8Rng,
    pub ledger: Co2Ledger,
    pub counters: EventCounters,
    pub env: Environment,
    /// Tick being executed (0 before the first step)
    pub tick: u64,
}

impl World {
    /// Register `entity` and place it on the grid at its position.
    ///
    /// Nothing is registered if the placement fails.
    pub fn spawn(&mut self, entity: Entity) -> Result<EntityId> {
        let id = self.registry.next_id();
        self.grid.place(entity.pos(), id, entity.occupant())?;
        let inserted = self.registry.insert(entity);
        debug_assert_eq!(id, inserted);
        Ok(inserted)
    }

    /// Remove an entity from both the registry and the grid. No-op if absent.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.registry.remove(id)?;
        self.grid.remove(entity.pos(), id);
        Some(entity)
    }

    /// Replace whatever covers the ground at `pos` with `cover`.
    ///
    /// The old ground entity is dropped; the new one gets a fresh identity and
    /// is not visited until the next tick.
    pub fn replace_ground(&mut self, pos: Position, cover: GroundCover) -> Result<EntityId> {
        let kind = cover.kind();
        let id = self.registry.next_id();
        let previous = self.grid.replace_ground(pos, id, kind)?;
        self.registry.insert(Entity::ground(pos, cover));
        if let Some((old, _)) = previous {
            self.registry.remove(old);
        }
        Ok(id)
    }

    /// Ground kind at `pos`
    #[inline]
    pub fn ground_kind(&self, pos: Position) -> Option<GroundKind> {
        self.grid.ground_at(pos).map(|(_, kind)| kind)
    }

    /// Vegetation at `pos`
    pub fn tree_at(&self, pos: Position) -> Option<(EntityId, &Tree)> {
        let (id, kind) = self.grid.ground_at(pos)?;
        if kind != GroundKind::Vegetation {
            return None;
        }
        self.registry.tree(id).map(|tree| (id, tree))
    }

    pub fn tree_at_mut(&mut self, pos: Position) -> Option<&mut Tree> {
        let (id, kind) = self.grid.ground_at(pos)?;
        if kind != GroundKind::Vegetation {
            return None;
        }
        self.registry.tree_mut(id)
    }

    /// Whether `pos` holds `Fine` vegetation
    #[inline]
    pub fn is_fine(&self, pos: Position) -> bool {
        self.tree_at(pos).is_some_and(|(_, tree)| tree.is_fine())
    }

    /// Position of a live entity
    pub fn position_of(&self, id: EntityId) -> Result<Position> {
        self.registry
            .get(id)
            .map(Entity::pos)
            .ok_or(SimError::UnknownEntity(id))
    }

    /// Move an aerial entity, keeping registry and grid in step.
    pub fn move_aerial(&mut self, id: EntityId, to: Position) -> Result<()> {
        let from = match self.registry.get(id) {
            Some(Entity::Cloud(cloud)) => cloud.pos,
            Some(Entity::Firefighter(firefighter)) => firefighter.pos,
            Some(Entity::Ground(_)) | None => return Err(SimError::UnknownEntity(id)),
        };
        self.grid.move_entity(id, from, to)?;
        match self.registry.get_mut(id) {
            Some(Entity::Cloud(cloud)) => cloud.pos = to,
            Some(Entity::Firefighter(firefighter)) => firefighter.pos = to,
            Some(Entity::Ground(_)) | None => {}
        }
        Ok(())
    }

    /// Put out `Burning` vegetation at `pos`. Returns whether it was burning.
    pub(crate) fn extinguish_at(&mut self, pos: Position) -> bool {
        self.tree_at_mut(pos).is_some_and(Tree::extinguish)
    }
}
