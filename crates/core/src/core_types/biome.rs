//! Biome profiles
//!
//! A biome fixes the target vegetation density, climate, CO2 emission factor
//! and canopy-size distribution of a run. The engine only reads the numeric
//! fields; color and image path are carried for host-side rendering.

use crate::core_types::units::Fraction;
use crate::error::SimError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Smallest canopy size a sampled tree may have
pub const MIN_CANOPY_SIZE: f64 = 0.1;

/// Normal distribution described by its mean and standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDistribution {
    pub mean: f64,
    pub std_dev: f64,
}

impl SizeDistribution {
    pub const fn new(mean: f64, std_dev: f64) -> Self {
        SizeDistribution { mean, std_dev }
    }

    /// Draw a canopy size, clamped to [`MIN_CANOPY_SIZE`].
    ///
    /// Box-Muller transform; always consumes exactly two draws so the RNG
    /// stream stays aligned regardless of the result.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u1: f64 = rng.random::<f64>().max(f64::EPSILON);
        let u2: f64 = rng.random::<f64>();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        (self.mean + z * self.std_dev).max(MIN_CANOPY_SIZE)
    }
}

/// Resolved biome profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Biome {
    pub name: String,
    /// Target fraction of vegetated cells
    pub density: Fraction,
    /// Absolute humidity (g/m³)
    pub humidity: f64,
    /// Mean temperature (°C)
    pub temperature: f64,
    /// Multiplier on the per-tree burn emission
    pub co2_factor: f64,
    /// Canopy size (m)
    pub canopy_size: SizeDistribution,
    /// Vegetation color as a hex string, `None` uses the host default
    pub color: Option<String>,
    /// Sprite path for the host, if any
    pub image: Option<String>,
}

impl Biome {
    /// Generic forest used when no biome is selected
    #[must_use]
    pub fn default_forest() -> Self {
        Biome {
            name: "Default".to_string(),
            density: Fraction::new(0.65),
            humidity: 20.0,
            temperature: 25.0,
            co2_factor: 1.0,
            canopy_size: SizeDistribution::new(15.0, 5.0),
            color: Some("#00AA00".to_string()),
            image: None,
        }
    }

    /// Brazilian savanna: sparse, dry, small trees
    #[must_use]
    pub fn cerrado() -> Self {
        Biome {
            name: "Cerrado".to_string(),
            density: Fraction::new(0.5),
            humidity: 10.0,
            temperature: 25.0,
            co2_factor: 0.8,
            canopy_size: SizeDistribution::new(6.0, 2.5),
            color: Some("#67B921".to_string()),
            image: None,
        }
    }

    /// Tropical rainforest: dense, humid, carbon-rich
    #[must_use]
    pub fn amazonia() -> Self {
        Biome {
            name: "Amazônia".to_string(),
            density: Fraction::new(0.9),
            humidity: 30.0,
            temperature: 27.0,
            co2_factor: 1.3,
            canopy_size: SizeDistribution::new(8.0, 3.0),
            color: Some("#009933".to_string()),
            image: None,
        }
    }

    /// Semi-arid scrubland
    #[must_use]
    pub fn caatinga() -> Self {
        Biome {
            name: "Caatinga".to_string(),
            density: Fraction::new(0.2),
            humidity: 3.0,
            temperature: 30.0,
            co2_factor: 0.6,
            canopy_size: SizeDistribution::new(4.0, 2.0),
            color: Some("#cccc00".to_string()),
            image: None,
        }
    }

    /// Seasonally flooded wetland
    #[must_use]
    pub fn pantanal() -> Self {
        Biome {
            name: "Pantanal".to_string(),
            density: Fraction::new(0.3),
            humidity: 35.0,
            temperature: 28.0,
            co2_factor: 0.9,
            canopy_size: SizeDistribution::new(7.0, 3.0),
            color: Some("#339966".to_string()),
            image: None,
        }
    }

    /// Look up a preset by name (case-insensitive, accent optional).
    pub fn from_name(name: &str) -> Result<Self, SimError> {
        match name.trim().to_lowercase().as_str() {
            "default" => Ok(Self::default_forest()),
            "cerrado" => Ok(Self::cerrado()),
            "amazônia" | "amazonia" => Ok(Self::amazonia()),
            "caatinga" => Ok(Self::caatinga()),
            "pantanal" => Ok(Self::pantanal()),
            other => Err(SimError::config(
                "biome_name",
                format!(
                    "unknown biome '{other}', expected one of Default, Cerrado, Amazônia, Caatinga, Pantanal"
                ),
            )),
        }
    }

    /// All presets in table order
    pub fn presets() -> Vec<Biome> {
        vec![
            Self::default_forest(),
            Self::cerrado(),
            Self::amazonia(),
            Self::caatinga(),
            Self::pantanal(),
        ]
    }
}

impl Default for Biome {
    fn default() -> Self {
        Self::default_forest()
    }
}
