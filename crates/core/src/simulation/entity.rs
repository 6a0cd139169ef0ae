//! Entity variants held by the registry
//!
//! Ground-layer occupants are one tagged variant so the engine matches on
//! them exhaustively. Clouds and firefighters are aerial and never exclude a
//! ground occupant.

use crate::core_types::{Position, Tree};
use crate::grid::{AerialKind, GroundKind, Occupant};
use crate::suppression::Firefighter;
use crate::weather::Cloud;
use serde::{Deserialize, Serialize};

/// Flammable strip of continuous fuel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corridor {
    /// Chebyshev radius over which ignition is forwarded
    pub spread_radius: i32,
    burned: bool,
}

impl Corridor {
    pub fn new(spread_radius: i32) -> Self {
        Corridor {
            spread_radius,
            burned: false,
        }
    }

    pub fn is_burned(&self) -> bool {
        self.burned
    }

    /// Mark burned. Returns `false` if it already was.
    pub(crate) fn burn(&mut self) -> bool {
        !std::mem::replace(&mut self.burned, true)
    }
}

/// What covers a ground cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GroundCover {
    Bare,
    Vegetation(Tree),
    Lake,
    Corridor(Corridor),
    Obstacle,
}

impl GroundCover {
    pub fn kind(&self) -> GroundKind {
        match self {
            GroundCover::Bare => GroundKind::Bare,
            GroundCover::Vegetation(_) => GroundKind::Vegetation,
            GroundCover::Lake => GroundKind::Lake,
            GroundCover::Corridor(_) => GroundKind::Corridor,
            GroundCover::Obstacle => GroundKind::Obstacle,
        }
    }
}

/// Ground-layer entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundEntity {
    pub pos: Position,
    pub cover: GroundCover,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entity {
    Ground(GroundEntity),
    Cloud(Cloud),
    Firefighter(Firefighter),
}

impl Entity {
    pub fn ground(pos: Position, cover: GroundCover) -> Self {
        Entity::Ground(GroundEntity { pos, cover })
    }

    pub fn pos(&self) -> Position {
        match self {
            Entity::Ground(g) => g.pos,
            Entity::Cloud(c) => c.pos,
            Entity::Firefighter(f) => f.pos,
        }
    }

    /// Grid layer and kind of this entity
    pub fn occupant(&self) -> Occupant {
        match self {
            Entity::Ground(g) => Occupant::Ground(g.cover.kind()),
            Entity::Cloud(_) => Occupant::Aerial(AerialKind::Cloud),
            Entity::Firefighter(_) => Occupant::Aerial(AerialKind::Firefighter),
        }
    }

    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Entity::Ground(GroundEntity {
                cover: GroundCover::Vegetation(tree),
                ..
            }) => Some(tree),
            _ => None,
        }
    }

    pub fn as_tree_mut(&mut self) -> Option<&mut Tree> {
        match self {
            Entity::Ground(GroundEntity {
                cover: GroundCover::Vegetation(tree),
                ..
            }) => Some(tree),
            _ => None,
        }
    }

    pub fn as_cloud(&self) -> Option<&Cloud> {
        match self {
            Entity::Cloud(cloud) => Some(cloud),
            _ => None,
        }
    }

    pub fn as_cloud_mut(&mut self) -> Option<&mut Cloud> {
        match self {
            Entity::Cloud(cloud) => Some(cloud),
            _ => None,
        }
    }

    pub fn as_corridor_mut(&mut self) -> Option<&mut Corridor> {
        match self {
            Entity::Ground(GroundEntity {
                cover: GroundCover::Corridor(corridor),
                ..
            }) => Some(corridor),
            _ => None,
        }
    }
}
