//! 2-D occupancy grid
//!
//! Each cell holds at most one ground-layer occupant (bare ground, vegetation,
//! lake, corridor or obstacle) and a bounded list of aerial occupants (clouds,
//! firefighters). The grid only records *which* entity of *which kind* sits in
//! a cell; entity state lives in the registry.

use crate::core_types::{Connectivity, EntityId, Position, RING_TWO_OFFSETS};
use crate::error::{Result, SimError};
use serde::{Deserialize, Serialize};

/// Kind of a ground-layer occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundKind {
    Bare,
    Vegetation,
    Lake,
    Corridor,
    Obstacle,
}

/// Kind of an aerial occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AerialKind {
    Cloud,
    Firefighter,
}

/// Layer and kind of an occupant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    Ground(GroundKind),
    Aerial(AerialKind),
}

/// Occupancy record of one cell
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GridCell {
    ground: Option<(EntityId, GroundKind)>,
    aerial: Vec<(EntityId, AerialKind)>,
}

impl GridCell {
    pub fn ground(&self) -> Option<(EntityId, GroundKind)> {
        self.ground
    }

    pub fn aerial(&self) -> &[(EntityId, AerialKind)] {
        &self.aerial
    }

    fn contains(&self, id: EntityId) -> bool {
        self.ground.is_some_and(|(g, _)| g == id) || self.aerial.iter().any(|&(a, _)| a == id)
    }
}

/// Finite, non-toroidal grid of cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<GridCell>,
    max_aerial_per_cell: usize,
}

/// Number of cells of a `width x height` grid.
///
/// Rejects non-positive dimensions and areas that overflow `usize`.
pub fn cell_count(width: i32, height: i32) -> Result<usize> {
    let width = usize::try_from(width)
        .ok()
        .filter(|&w| w > 0)
        .ok_or_else(|| SimError::config("width", format!("must be positive, got {width}")))?;
    let height = usize::try_from(height)
        .ok()
        .filter(|&h| h > 0)
        .ok_or_else(|| SimError::config("height", format!("must be positive, got {height}")))?;
    width.checked_mul(height).ok_or_else(|| {
        SimError::config("width", format!("{width}x{height} grid has too many cells"))
    })
}

/// Row-major index of an in-bounds `pos`
#[inline]
pub(crate) fn row_major(pos: Position, width: i32) -> usize {
    pos.y as usize * width as usize + pos.x as usize
}

impl Grid {
    /// Create an empty `width x height` grid
    pub fn new(width: i32, height: i32, max_aerial_per_cell: usize) -> Result<Self> {
        let area = cell_count(width, height)?;
        if max_aerial_per_cell == 0 {
            return Err(SimError::config("max_aerial_per_cell", "must be at least 1"));
        }
        Ok(Grid {
            width,
            height,
            cells: vec![GridCell::default(); area],
            max_aerial_per_cell,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells
    #[inline]
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    /// Whether `pos` lies on the outermost ring of cells
    #[inline]
    pub fn is_on_border(&self, pos: Position) -> bool {
        pos.x == 0 || pos.y == 0 || pos.x == self.width - 1 || pos.y == self.height - 1
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        row_major(pos, self.width)
    }

    fn check_bounds(&self, pos: Position) -> Result<()> {
        if self.in_bounds(pos) {
            Ok(())
        } else {
            Err(SimError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Occupancy record at `pos`, `None` when out of bounds
    pub fn cell(&self, pos: Position) -> Option<&GridCell> {
        self.in_bounds(pos).then(|| &self.cells[self.index(pos)])
    }

    /// Put `id` into the cell at `pos`.
    ///
    /// Fails with `OccupiedCell` if a ground occupant is placed over another
    /// ground occupant, or the aerial layer is at capacity.
    pub fn place(&mut self, pos: Position, id: EntityId, occupant: Occupant) -> Result<()> {
        self.check_bounds(pos)?;
        let max_aerial = self.max_aerial_per_cell;
        let idx = self.index(pos);
        let cell = &mut self.cells[idx];
        match occupant {
            Occupant::Ground(kind) => {
                if cell.ground.is_some() {
                    return Err(SimError::OccupiedCell { x: pos.x, y: pos.y });
                }
                cell.ground = Some((id, kind));
            }
            Occupant::Aerial(kind) => {
                if cell.aerial.len() >= max_aerial {
                    return Err(SimError::OccupiedCell { x: pos.x, y: pos.y });
                }
                cell.aerial.push((id, kind));
            }
        }
        Ok(())
    }

    /// Remove `id` from the cell at `pos`. No-op if absent.
    pub fn remove(&mut self, pos: Position, id: EntityId) {
        if !self.in_bounds(pos) {
            return;
        }
        let idx = self.index(pos);
        let cell = &mut self.cells[idx];
        if cell.ground.is_some_and(|(g, _)| g == id) {
            cell.ground = None;
        }
        cell.aerial.retain(|&(a, _)| a != id);
    }

    /// Move `id` from `from` to `to`; equivalent to remove + place.
    ///
    /// On failure the entity stays where it was.
    pub fn move_entity(&mut self, id: EntityId, from: Position, to: Position) -> Result<()> {
        self.check_bounds(to)?;
        let occupant = self
            .occupant_of(from, id)
            .ok_or(SimError::UnknownEntity(id))?;
        if from == to {
            return Ok(());
        }
        self.remove(from, id);
        if let Err(err) = self.place(to, id, occupant) {
            self.place(from, id, occupant)?;
            return Err(err);
        }
        Ok(())
    }

    /// Swap the ground occupant at `pos` for a new one, returning the old.
    pub(crate) fn replace_ground(
        &mut self,
        pos: Position,
        id: EntityId,
        kind: GroundKind,
    ) -> Result<Option<(EntityId, GroundKind)>> {
        self.check_bounds(pos)?;
        let idx = self.index(pos);
        Ok(self.cells[idx].ground.replace((id, kind)))
    }

    fn occupant_of(&self, pos: Position, id: EntityId) -> Option<Occupant> {
        let cell = self.cell(pos)?;
        if let Some((g, kind)) = cell.ground {
            if g == id {
                return Some(Occupant::Ground(kind));
            }
        }
        cell.aerial
            .iter()
            .find(|&&(a, _)| a == id)
            .map(|&(_, kind)| Occupant::Aerial(kind))
    }

    /// Whether `id` is recorded at `pos`
    pub fn contains(&self, pos: Position, id: EntityId) -> bool {
        self.cell(pos).is_some_and(|c| c.contains(id))
    }

    /// Ground occupant at `pos`
    #[inline]
    pub fn ground_at(&self, pos: Position) -> Option<(EntityId, GroundKind)> {
        self.cell(pos).and_then(GridCell::ground)
    }

    /// Aerial occupants at `pos`, empty when out of bounds
    pub fn aerial_at(&self, pos: Position) -> &[(EntityId, AerialKind)] {
        self.cell(pos).map_or(&[], GridCell::aerial)
    }

    /// Ground occupant first, then aerial occupants in arrival order
    pub fn occupants_at(&self, pos: Position) -> Vec<(EntityId, Occupant)> {
        let Some(cell) = self.cell(pos) else {
            return Vec::new();
        };
        cell.ground
            .iter()
            .map(|&(id, kind)| (id, Occupant::Ground(kind)))
            .chain(cell.aerial.iter().map(|&(id, kind)| (id, Occupant::Aerial(kind))))
            .collect()
    }

    /// In-grid positions within `radius` of `pos`, center excluded.
    ///
    /// Moore uses Chebyshev distance, von Neumann uses Manhattan distance.
    /// Order is row-major from the lowest `y`, stable across calls.
    pub fn neighbors(&self, pos: Position, connectivity: Connectivity, radius: i32) -> Vec<Position> {
        let mut result = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dy == 0 {
                    continue;
                }
                if connectivity == Connectivity::VonNeumann && dx.abs() + dy.abs() > radius {
                    continue;
                }
                let candidate = Position::new(pos.x + dx, pos.y + dy);
                if self.in_bounds(candidate) {
                    result.push(candidate);
                }
            }
        }
        result
    }

    /// In-grid 8-neighbors of `pos`
    #[inline]
    pub fn moore(&self, pos: Position) -> Vec<Position> {
        self.neighbors(pos, Connectivity::Moore, 1)
    }

    /// In-grid members of the fixed second regrowth ring
    pub fn ring_two(&self, pos: Position) -> Vec<Position> {
        RING_TWO_OFFSETS
            .iter()
            .map(|&(dx, dy)| Position::new(pos.x + dx, pos.y + dy))
            .filter(|&p| self.in_bounds(p))
            .collect()
    }

    /// All positions in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Position::new(x, y)))
    }
}
