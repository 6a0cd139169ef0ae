//! Entity arena
//!
//! Live entities are kept in an `FxHashMap` keyed by [`EntityId`], so storage
//! and scans follow the live population rather than the number of identities
//! ever issued. Identities are handed out monotonically from a `u64` counter
//! and never reused; a stale id simply resolves to `None`.

use crate::core_types::{EntityId, Tree};
use crate::simulation::entity::Entity;
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    entities: FxHashMap<EntityId, Entity>,
    next: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity the next `insert` will return
    #[inline]
    pub fn next_id(&self) -> EntityId {
        EntityId(self.next)
    }

    pub fn insert(&mut self, entity: Entity) -> EntityId {
        let id = self.next_id();
        self.next += 1;
        self.entities.insert(id, entity);
        id
    }

    /// Remove and return the entity. `None` if absent.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    #[inline]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    #[inline]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn tree(&self, id: EntityId) -> Option<&Tree> {
        self.get(id)?.as_tree()
    }

    pub fn tree_mut(&mut self, id: EntityId) -> Option<&mut Tree> {
        self.get_mut(id)?.as_tree_mut()
    }

    /// Live entity count
    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live identities in ascending order
    pub fn ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Live entities in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter().map(|(&id, entity)| (id, entity))
    }

    /// Live entities, for parallel read-only scans
    pub(crate) fn par_entities(&self) -> impl ParallelIterator<Item = &Entity> {
        self.entities.par_iter().map(|(_, entity)| entity)
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.entities.capacity()
    }
}
