//! Grid coordinates, offsets and entity identities

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer displacement between two cells
///
/// Also used as the unit vector for wind and cloud drift, with `+x` pointing
/// East and `+y` pointing North.
pub type Offset = Vector2<i32>;

/// Stable identity of a registry entity. Identities are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cell address on the finite, non-toroidal grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Position displaced by `offset` (may fall outside the grid)
    #[inline]
    #[must_use]
    pub fn offset(self, offset: Offset) -> Self {
        Position::new(self.x + offset.x, self.y + offset.y)
    }

    /// Displacement from `self` to `other`
    #[inline]
    pub fn delta_to(self, other: Position) -> Offset {
        Offset::new(other.x - self.x, other.y - self.y)
    }

    #[inline]
    pub fn chebyshev(self, other: Position) -> i32 {
        (self.x - other.x).abs().max((self.y - other.y).abs())
    }

    #[inline]
    pub fn manhattan(self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Position::new(x, y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Neighborhood shape used by neighbor queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Connectivity {
    /// 4-neighborhood, Manhattan distance
    VonNeumann,
    /// 8-neighborhood, Chebyshev distance
    Moore,
}

/// Second regrowth ring: the eight cells two steps away along the axes and
/// diagonals. Fixed so ring sizes (and therefore probabilities) are constant.
pub const RING_TWO_OFFSETS: [(i32, i32); 8] = [
    (-2, -2),
    (0, -2),
    (2, -2),
    (-2, 0),
    (2, 0),
    (-2, 2),
    (0, 2),
    (2, 2),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distances() {
        let a = Position::new(1, 1);
        let b = Position::new(3, 2);
        assert_eq!(a.chebyshev(b), 2);
        assert_eq!(a.manhattan(b), 3);
        assert_eq!(a.delta_to(b), Offset::new(2, 1));
        assert_eq!(a.offset(Offset::new(2, 1)), b);
    }

    #[test]
    fn test_ring_two_is_at_chebyshev_two() {
        let origin = Position::new(0, 0);
        for (dx, dy) in RING_TWO_OFFSETS {
            assert_eq!(origin.chebyshev(Position::new(dx, dy)), 2);
        }
    }
}
