//! Prevailing wind
//!
//! Sign convention: the wind vector points in the direction the wind blows
//! *toward*, with `+x` = East and `+y` = North. `WindDirection::North` is
//! therefore `(0, 1)` and pushes fire toward larger `y`. Propagation and cloud
//! drift both read the vector from [`Wind::vector`], the single point of
//! translation.

use crate::core_types::position::Offset;
use crate::core_types::units::Fraction;
use crate::error::SimError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Cardinal wind direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindDirection {
    North,
    South,
    East,
    West,
}

impl WindDirection {
    /// Unit vector the wind blows toward
    pub fn unit_vector(self) -> Offset {
        match self {
            WindDirection::North => Offset::new(0, 1),
            WindDirection::South => Offset::new(0, -1),
            WindDirection::East => Offset::new(1, 0),
            WindDirection::West => Offset::new(-1, 0),
        }
    }
}

impl FromStr for WindDirection {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "north" => Ok(WindDirection::North),
            "s" | "south" => Ok(WindDirection::South),
            "e" | "east" => Ok(WindDirection::East),
            "w" | "west" => Ok(WindDirection::West),
            other => Err(SimError::config(
                "wind_direction",
                format!("unknown direction '{other}', expected one of N, S, E, W"),
            )),
        }
    }
}

/// Parse an optional wind direction where `"none"` (or empty) means calm.
pub fn parse_optional_direction(s: &str) -> Result<Option<WindDirection>, SimError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "" | "none" => Ok(None),
        _ => s.parse().map(Some),
    }
}

/// Wind direction plus intensity in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub direction: Option<WindDirection>,
    pub intensity: Fraction,
}

impl Wind {
    pub const CALM: Wind = Wind {
        direction: None,
        intensity: Fraction::ZERO,
    };

    pub fn new(direction: Option<WindDirection>, intensity: Fraction) -> Self {
        Wind {
            direction,
            intensity,
        }
    }

    /// No direction, or zero intensity. Calm wind biases nothing.
    pub fn is_calm(&self) -> bool {
        self.direction.is_none() || *self.intensity <= 0.0
    }

    /// Unit vector of the wind, `None` when calm
    pub fn vector(&self) -> Option<Offset> {
        if self.is_calm() {
            None
        } else {
            self.direction.map(WindDirection::unit_vector)
        }
    }
}

impl Default for Wind {
    fn default() -> Self {
        Wind::CALM
    }
}
