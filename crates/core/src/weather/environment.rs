//! Per-run environment: biome, wind, rain schedule and calibration constants
//!
//! Resolved once from the configuration and read-only during a tick.

use crate::config::SimulationConfig;
use crate::core_types::{Biome, Fraction, Offset, Percent, Wind};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Cloud injection schedule and cloud behavior constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RainSchedule {
    pub rainy_season: bool,
    pub cloud_step: u32,
    pub clouds_per_step: u32,
    pub clouds_size: u32,
    pub cloud_speed: f64,
    pub direction_change_rate: f64,
    /// Size at which a cloud is flagged full
    pub rain_trigger_size: u32,
}

impl RainSchedule {
    /// Clouds to inject at the end of `tick`
    pub fn clouds_due(&self, tick: u64) -> u32 {
        if self.rainy_season && self.cloud_step > 0 && tick % u64::from(self.cloud_step) == 0 {
            self.clouds_per_step
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub biome: Biome,
    pub wind: Wind,
    pub rain: RainSchedule,
    /// Regrowth probability multiplier
    pub regrowth_speed: f64,
    pub corridor_spread_radius: i32,
    /// Alpha at zero wind (%)
    pub baseline_threshold: f64,
    /// Beta at zero wind (%)
    pub downwind_threshold: f64,
    pub humidity_ignition_factor: f64,
    /// Random re-ignition period in ticks (0 = never)
    pub fire_step: u32,
}

impl Environment {
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Environment {
            biome: config.biome()?,
            wind: config.wind()?,
            rain: RainSchedule {
                rainy_season: config.rainy_season,
                cloud_step: config.cloud_step,
                clouds_per_step: config.clouds_per_step,
                clouds_size: config.clouds_size.max(1),
                cloud_speed: config.cloud_speed,
                direction_change_rate: config.cloud_direction_change_rate,
                rain_trigger_size: config.cloud_rain_size,
            },
            regrowth_speed: config.reprod_speed,
            corridor_spread_radius: config.corridor_spread_radius,
            baseline_threshold: config.baseline_threshold,
            downwind_threshold: config.downwind_threshold,
            humidity_ignition_factor: config.humidity_ignition_factor,
            fire_step: if config.fire_enabled { config.fire_step } else { 0 },
        })
    }

    /// Target fraction of vegetated cells
    #[inline]
    pub fn density_target(&self) -> Fraction {
        self.biome.density
    }

    /// Percentage a uniform draw in `[0, 100)` must exceed to ignite the
    /// `Fine` neighbor at `offset` from a burning tree.
    ///
    /// Downwind (offset equal to the wind unit vector):
    /// `beta = downwind - 15 * intensity`. Every other direction:
    /// `alpha = baseline + 25 * intensity`. Calm wind uses alpha everywhere.
    pub fn ignition_threshold(&self, offset: Offset) -> Percent {
        let humidity_shift = self.humidity_ignition_factor * self.biome.humidity;
        let threshold = match self.wind.vector() {
            Some(downwind) if downwind == offset => {
                self.downwind_threshold - 15.0 * *self.wind.intensity
            }
            Some(_) => self.baseline_threshold + 25.0 * *self.wind.intensity,
            None => self.baseline_threshold,
        };
        Percent::new((threshold + humidity_shift).clamp(0.0, 100.0))
    }

    /// Whether a random re-ignition is scheduled at the end of `tick`
    pub fn fire_due(&self, tick: u64) -> bool {
        self.fire_step > 0 && tick % u64::from(self.fire_step) == 0
    }
}

impl Default for Environment {
    fn default() -> Self {
        // The default configuration always validates
        Environment::from_config(&SimulationConfig::default())
            .unwrap_or_else(|err| unreachable!("default configuration is invalid: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::WindDirection;

    fn moore_offsets() -> Vec<Offset> {
        let mut offsets = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx != 0 || dy != 0 {
                    offsets.push(Offset::new(dx, dy));
                }
            }
        }
        offsets
    }

    #[test]
    fn test_zero_wind_is_direction_independent() {
        for direction in [None, Some(WindDirection::North), Some(WindDirection::West)] {
            let env = Environment {
                wind: Wind::new(direction, Fraction::ZERO),
                ..Environment::default()
            };
            for offset in moore_offsets() {
                assert_eq!(env.ignition_threshold(offset), Percent::new(70.0));
            }
        }
    }

    #[test]
    fn test_wind_lowers_downwind_threshold_only() {
        let env = Environment {
            wind: Wind::new(Some(WindDirection::East), Fraction::new(1.0)),
            ..Environment::default()
        };
        assert_eq!(env.ignition_threshold(Offset::new(1, 0)), Percent::new(20.0));
        assert_eq!(env.ignition_threshold(Offset::new(-1, 0)), Percent::new(95.0));
        assert_eq!(env.ignition_threshold(Offset::new(1, 1)), Percent::new(95.0));
    }

    #[test]
    fn test_humidity_raises_thresholds() {
        let mut env = Environment::default();
        env.humidity_ignition_factor = 0.5;
        // Default biome humidity is 20 g/m³
        assert_eq!(env.ignition_threshold(Offset::new(0, 1)), Percent::new(80.0));
    }

    #[test]
    fn test_cloud_schedule() {
        let mut rain = Environment::default().rain;
        rain.rainy_season = true;
        rain.cloud_step = 5;
        rain.clouds_per_step = 2;
        assert_eq!(rain.clouds_due(5), 2);
        assert_eq!(rain.clouds_due(6), 0);
        rain.rainy_season = false;
        assert_eq!(rain.clouds_due(10), 0);
    }
}
