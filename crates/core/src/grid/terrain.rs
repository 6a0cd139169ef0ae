//! Terrain feature layout
//!
//! Decides where lakes, fuel corridors and obstacles go before any entity is
//! created. Generation order is lakes, corridors, obstacles; later features
//! never overwrite earlier ones.

use crate::core_types::{Fraction, Position};
use crate::error::Result;
use crate::grid::forest_grid::{cell_count, row_major};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attempts allowed per requested cell before a generator gives up
const ATTEMPTS_PER_CELL: usize = 20;

/// Non-vegetation ground feature
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainFeature {
    Lake,
    Corridor,
    Obstacle,
}

/// Terrain generation options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerrainParams {
    pub water_density: Fraction,
    pub num_of_lakes: u32,
    /// Scatter single-cell ponds instead of growing `num_of_lakes` blobs
    pub individual_lakes: bool,
    pub corridor: bool,
    pub corridor_density: Fraction,
    pub obstacles: bool,
    pub obstacles_density: Fraction,
}

impl Default for TerrainParams {
    fn default() -> Self {
        TerrainParams {
            water_density: Fraction::ZERO,
            num_of_lakes: 0,
            individual_lakes: false,
            corridor: false,
            corridor_density: Fraction::ZERO,
            obstacles: false,
            obstacles_density: Fraction::ZERO,
        }
    }
}

/// Feature map of the whole grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainLayout {
    width: i32,
    height: i32,
    features: Vec<Option<TerrainFeature>>,
}

impl TerrainLayout {
    /// Layout with no features
    pub fn empty(width: i32, height: i32) -> Result<Self> {
        Ok(TerrainLayout {
            width,
            height,
            features: vec![None; cell_count(width, height)?],
        })
    }

    /// Generate a layout from `params`
    pub fn generate<R: Rng + ?Sized>(
        width: i32,
        height: i32,
        params: &TerrainParams,
        rng: &mut R,
    ) -> Result<Self> {
        let mut layout = Self::empty(width, height)?;
        let area = layout.features.len();

        let lake_cells = cell_quota(params.water_density, area);
        if params.individual_lakes {
            layout.scatter(TerrainFeature::Lake, lake_cells, rng);
        } else if params.num_of_lakes > 0 {
            let lakes = params.num_of_lakes as usize;
            let share = lake_cells / lakes;
            let remainder = lake_cells % lakes;
            for i in 0..lakes {
                let size = share + usize::from(i < remainder);
                layout.grow_lake(size, rng);
            }
        }

        if params.corridor {
            layout.lay_corridors(cell_quota(params.corridor_density, area), rng);
        }

        if params.obstacles {
            layout.scatter(
                TerrainFeature::Obstacle,
                cell_quota(params.obstacles_density, area),
                rng,
            );
        }

        Ok(layout)
    }

    #[inline]
    fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    #[inline]
    fn index(&self, pos: Position) -> usize {
        row_major(pos, self.width)
    }

    /// Feature at `pos`, `None` for plain ground or out of bounds
    pub fn feature_at(&self, pos: Position) -> Option<TerrainFeature> {
        if self.in_bounds(pos) {
            self.features[self.index(pos)]
        } else {
            None
        }
    }

    /// Set a feature explicitly. Returns `false` if `pos` is out of bounds.
    pub fn set(&mut self, pos: Position, feature: Option<TerrainFeature>) -> bool {
        if !self.in_bounds(pos) {
            return false;
        }
        let idx = self.index(pos);
        self.features[idx] = feature;
        true
    }

    /// Number of cells carrying `feature`
    pub fn count(&self, feature: TerrainFeature) -> usize {
        self.features.iter().filter(|f| **f == Some(feature)).count()
    }

    fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(rng.random_range(0..self.width), rng.random_range(0..self.height))
    }

    fn try_claim(&mut self, pos: Position, feature: TerrainFeature) -> bool {
        if self.in_bounds(pos) && self.feature_at(pos).is_none() {
            let idx = self.index(pos);
            self.features[idx] = Some(feature);
            true
        } else {
            false
        }
    }

    fn scatter<R: Rng + ?Sized>(&mut self, feature: TerrainFeature, cells: usize, rng: &mut R) {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < cells && attempts < cells * ATTEMPTS_PER_CELL {
            attempts += 1;
            let pos = self.random_position(rng);
            if self.try_claim(pos, feature) {
                placed += 1;
            }
        }
    }

    /// Grow one lake by random 4-neighbor accretion from a free seed cell.
    fn grow_lake<R: Rng + ?Sized>(&mut self, size: usize, rng: &mut R) {
        if size == 0 {
            return;
        }
        let mut blob = Vec::with_capacity(size);
        let mut attempts = 0;
        while blob.is_empty() && attempts < ATTEMPTS_PER_CELL {
            attempts += 1;
            let seed = self.random_position(rng);
            if self.try_claim(seed, TerrainFeature::Lake) {
                blob.push(seed);
            }
        }

        const STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
        attempts = 0;
        while !blob.is_empty() && blob.len() < size && attempts < size * ATTEMPTS_PER_CELL {
            attempts += 1;
            let from = blob[rng.random_range(0..blob.len())];
            let (dx, dy) = STEPS[rng.random_range(0..STEPS.len())];
            let next = Position::new(from.x + dx, from.y + dy);
            if self.try_claim(next, TerrainFeature::Lake) {
                blob.push(next);
            }
        }
    }

    /// Lay straight horizontal or vertical corridor strips.
    fn lay_corridors<R: Rng + ?Sized>(&mut self, cells: usize, rng: &mut R) {
        let mut placed = 0;
        let mut attempts = 0;
        while placed < cells && attempts < cells * ATTEMPTS_PER_CELL {
            attempts += 1;
            let horizontal = rng.random_bool(0.5);
            let span = if horizontal { self.width } else { self.height };
            let length = rng.random_range(3.min(span)..=(span / 2).max(3.min(span)));
            let (dx, dy) = if horizontal { (1, 0) } else { (0, 1) };

            let mut pos = self.random_position(rng);
            for _ in 0..length {
                if placed >= cells || !self.in_bounds(pos) {
                    break;
                }
                if self.try_claim(pos, TerrainFeature::Corridor) {
                    placed += 1;
                }
                pos = Position::new(pos.x + dx, pos.y + dy);
            }
        }
    }
}

/// Cells a density asks for on a grid of `area` cells
fn cell_quota(density: Fraction, area: usize) -> usize {
    (*density * area as f64).round() as usize
}
