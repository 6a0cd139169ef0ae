//! Run configuration
//!
//! `SimulationConfig` mirrors the options a host exposes (grid size, biome,
//! ignition mode, wind, cloud schedule, terrain densities, regrowth speed,
//! firefighters). String-valued options are parsed and every value is checked
//! in [`SimulationConfig::validate`], so a bad configuration fails at
//! construction rather than silently falling back to a default.

use crate::core_types::wind::parse_optional_direction;
use crate::core_types::{Biome, Fraction, Wind};
use crate::error::{Result, SimError};
use crate::grid::{cell_count, TerrainParams};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a directional ignition band is laid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FirePosition {
    /// Row `y = height - 1` (North edge)
    Top,
    /// Row `y = 0`
    Bottom,
    /// Column `x = 0`
    Left,
    /// Column `x = width - 1`
    Right,
    /// Centered square
    Middle,
}

impl FromStr for FirePosition {
    type Err = SimError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "top" => Ok(FirePosition::Top),
            "bottom" => Ok(FirePosition::Bottom),
            "left" => Ok(FirePosition::Left),
            "right" => Ok(FirePosition::Right),
            "middle" => Ok(FirePosition::Middle),
            other => Err(SimError::config(
                "position_fire",
                format!("unknown position '{other}', expected Top, Bottom, Left, Right or Middle"),
            )),
        }
    }
}

/// Ignition seeding mode, exactly one per run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IgnitionMode {
    /// 1-7 random positions
    Random,
    /// A fixed edge band or centered square
    Directional(FirePosition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the single RNG stream
    pub seed: u64,
    pub width: i32,
    pub height: i32,
    pub biome_name: String,
    /// Overrides the biome density target when non-zero
    pub tree_density: f64,
    /// Seed an initial fire at all. Off gives a pure regrowth run.
    pub fire_enabled: bool,
    pub random_fire: bool,
    /// `Top | Bottom | Left | Right | Middle`, used when `random_fire` is off
    pub position_fire: String,
    /// Re-run random ignition every N ticks (0 = never)
    pub fire_step: u32,
    /// `N | S | E | W | None`
    pub wind_direction: String,
    pub wind_intensity: f64,
    /// Ignition threshold (%) for non-downwind neighbors at zero wind
    pub baseline_threshold: f64,
    /// Ignition threshold (%) for the downwind neighbor at zero wind
    pub downwind_threshold: f64,
    /// Threshold points added per g/m³ of biome humidity (0 = off)
    pub humidity_ignition_factor: f64,
    pub rainy_season: bool,
    /// Clouds created at initialization
    pub cloud_quantity: u32,
    /// Ticks between scheduled cloud injections
    pub cloud_step: u32,
    pub clouds_per_step: u32,
    /// Upper bound of a new cloud's random size
    pub clouds_size: u32,
    /// Cells per tick a cloud drifts
    pub cloud_speed: f64,
    /// Per-tick chance a cloud perturbs its direction
    pub cloud_direction_change_rate: f64,
    /// Size at which a cloud is flagged full
    pub cloud_rain_size: u32,
    pub water_density: f64,
    pub num_of_lakes: u32,
    pub individual_lakes: bool,
    pub corridor: bool,
    pub corridor_density: f64,
    /// Chebyshev radius a burning corridor forwards ignition over
    pub corridor_spread_radius: i32,
    pub obstacles: bool,
    pub obstacles_density: f64,
    /// Multiplier on regrowth probabilities (0 disables regrowth)
    pub reprod_speed: f64,
    pub fireman_quantity: u32,
    /// Aerial occupants (clouds, firefighters) allowed per cell
    pub max_aerial_per_cell: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            seed: 42,
            width: 100,
            height: 100,
            biome_name: "Default".to_string(),
            tree_density: 0.0,
            fire_enabled: true,
            random_fire: true,
            position_fire: "Left".to_string(),
            fire_step: 0,
            wind_direction: "None".to_string(),
            wind_intensity: 0.0,
            baseline_threshold: 70.0,
            downwind_threshold: 35.0,
            humidity_ignition_factor: 0.0,
            rainy_season: false,
            cloud_quantity: 0,
            cloud_step: 15,
            clouds_per_step: 0,
            clouds_size: 3,
            cloud_speed: 0.2,
            cloud_direction_change_rate: 0.1,
            cloud_rain_size: 6,
            water_density: 0.0,
            num_of_lakes: 1,
            individual_lakes: false,
            corridor: false,
            corridor_density: 0.0,
            corridor_spread_radius: 2,
            obstacles: false,
            obstacles_density: 0.0,
            reprod_speed: 1.0,
            fireman_quantity: 0,
            max_aerial_per_cell: 4,
        }
    }
}

fn unit_fraction(field: &str, value: f64) -> Result<Fraction> {
    let fraction = Fraction::new(value);
    if fraction.is_unit() {
        Ok(fraction)
    } else {
        Err(SimError::config(field, format!("must lie in [0, 1], got {value}")))
    }
}

fn percentage(field: &str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::config(field, format!("must lie in [0, 100], got {value}")))
    }
}

impl SimulationConfig {
    /// Check every option. Returns the first violation found.
    pub fn validate(&self) -> Result<()> {
        cell_count(self.width, self.height)?;
        self.biome()?;
        unit_fraction("tree_density", self.tree_density)?;
        self.ignition_mode()?;
        self.wind()?;
        percentage("baseline_threshold", self.baseline_threshold)?;
        percentage("downwind_threshold", self.downwind_threshold)?;
        if !self.humidity_ignition_factor.is_finite() {
            return Err(SimError::config("humidity_ignition_factor", "must be finite"));
        }
        if self.rainy_season && self.cloud_step == 0 {
            return Err(SimError::config(
                "cloud_step",
                "must be positive when rainy_season is on",
            ));
        }
        if (self.cloud_quantity > 0 || self.clouds_per_step > 0) && self.clouds_size == 0 {
            return Err(SimError::config("clouds_size", "must be at least 1"));
        }
        if !(self.cloud_speed.is_finite() && self.cloud_speed > 0.0) {
            return Err(SimError::config(
                "cloud_speed",
                format!("must be positive, got {}", self.cloud_speed),
            ));
        }
        unit_fraction("cloud_direction_change_rate", self.cloud_direction_change_rate)?;
        self.terrain()?;
        if self.corridor_spread_radius < 1 {
            return Err(SimError::config(
                "corridor_spread_radius",
                format!("must be at least 1, got {}", self.corridor_spread_radius),
            ));
        }
        if !(self.reprod_speed.is_finite() && self.reprod_speed >= 0.0) {
            return Err(SimError::config(
                "reprod_speed",
                format!("must be non-negative, got {}", self.reprod_speed),
            ));
        }
        if self.max_aerial_per_cell == 0 {
            return Err(SimError::config("max_aerial_per_cell", "must be at least 1"));
        }
        Ok(())
    }

    /// Biome profile with the density override applied
    pub fn biome(&self) -> Result<Biome> {
        let mut biome = Biome::from_name(&self.biome_name)?;
        let density = unit_fraction("tree_density", self.tree_density)?;
        if *density > 0.0 {
            biome.density = density;
        }
        Ok(biome)
    }

    pub fn ignition_mode(&self) -> Result<IgnitionMode> {
        if self.random_fire {
            Ok(IgnitionMode::Random)
        } else {
            Ok(IgnitionMode::Directional(self.position_fire.parse()?))
        }
    }

    pub fn wind(&self) -> Result<Wind> {
        let direction = parse_optional_direction(&self.wind_direction)?;
        let intensity = unit_fraction("wind_intensity", self.wind_intensity)?;
        Ok(Wind::new(direction, intensity))
    }

    pub fn terrain(&self) -> Result<TerrainParams> {
        Ok(TerrainParams {
            water_density: unit_fraction("water_density", self.water_density)?,
            num_of_lakes: self.num_of_lakes,
            individual_lakes: self.individual_lakes,
            corridor: self.corridor,
            corridor_density: unit_fraction("corridor_density", self.corridor_density)?,
            obstacles: self.obstacles,
            obstacles_density: unit_fraction("obstacles_density", self.obstacles_density)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::WindDirection;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SimulationConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_density_override() {
        let config = SimulationConfig {
            biome_name: "Cerrado".to_string(),
            tree_density: 0.8,
            ..SimulationConfig::default()
        };
        assert_eq!(config.biome().unwrap().density, Fraction::new(0.8));

        let config = SimulationConfig {
            biome_name: "Cerrado".to_string(),
            ..SimulationConfig::default()
        };
        assert_eq!(config.biome().unwrap().density, Fraction::new(0.5));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_large_grid_validates_without_overflow() {
        let config = SimulationConfig {
            width: 50_000,
            height: 50_000,
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_misconfiguration() {
        let cases = [
            SimulationConfig {
                width: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                biome_name: "Atlantis".to_string(),
                ..SimulationConfig::default()
            },
            SimulationConfig {
                tree_density: 1.5,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                wind_direction: "NNE".to_string(),
                ..SimulationConfig::default()
            },
            SimulationConfig {
                random_fire: false,
                position_fire: "Diagonal".to_string(),
                ..SimulationConfig::default()
            },
            SimulationConfig {
                rainy_season: true,
                cloud_step: 0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                reprod_speed: -1.0,
                ..SimulationConfig::default()
            },
            SimulationConfig {
                water_density: -0.2,
                ..SimulationConfig::default()
            },
        ];
        for config in cases {
            assert!(
                matches!(config.validate(), Err(SimError::Configuration { .. })),
                "expected configuration error for {config:?}"
            );
        }
    }

    #[test]
    fn test_parses_modes() {
        let config = SimulationConfig {
            random_fire: false,
            position_fire: "middle".to_string(),
            wind_direction: "S".to_string(),
            wind_intensity: 0.4,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.ignition_mode().unwrap(),
            IgnitionMode::Directional(FirePosition::Middle)
        );
        assert_eq!(config.wind().unwrap().direction, Some(WindDirection::South));
    }
}
