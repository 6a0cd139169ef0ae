//! Configuration loading: optional TOML file, then CLI overrides

use crate::HostError;
use clap::Args;
use forest_fire_core::SimulationConfig;
use std::path::PathBuf;

/// Options shared by every host binary
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// TOML file with `SimulationConfig` fields; missing fields take defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// RNG seed
    #[arg(short, long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub width: Option<i32>,

    #[arg(long)]
    pub height: Option<i32>,

    /// Biome preset (Default, Cerrado, Amazonia, Caatinga, Pantanal)
    #[arg(short, long)]
    pub biome: Option<String>,

    /// Density target override in [0, 1]
    #[arg(short, long)]
    pub density: Option<f64>,

    /// N, S, E, W or None
    #[arg(long)]
    pub wind_direction: Option<String>,

    /// Wind intensity in [0, 1]
    #[arg(long)]
    pub wind_intensity: Option<f64>,

    /// Ignite a Top, Bottom, Left, Right or Middle band instead of random spots
    #[arg(long)]
    pub fire_position: Option<String>,

    /// Regrowth speed multiplier
    #[arg(long)]
    pub reprod_speed: Option<f64>,

    /// Number of firefighters
    #[arg(long)]
    pub firemen: Option<u32>,

    /// Enable the rainy season cloud schedule
    #[arg(long)]
    pub rainy: bool,
}

impl ConfigArgs {
    /// Resolve the final configuration and validate it
    pub fn load(&self) -> Result<SimulationConfig, HostError> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| HostError::Read {
                    path: path.clone(),
                    source,
                })?;
                toml::from_str(&text).map_err(|source| HostError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            None => SimulationConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(biome) = &self.biome {
            config.biome_name.clone_from(biome);
        }
        if let Some(density) = self.density {
            config.tree_density = density;
        }
        if let Some(direction) = &self.wind_direction {
            config.wind_direction.clone_from(direction);
        }
        if let Some(intensity) = self.wind_intensity {
            config.wind_intensity = intensity;
        }
        if let Some(position) = &self.fire_position {
            config.random_fire = false;
            config.position_fire.clone_from(position);
        }
        if let Some(speed) = self.reprod_speed {
            config.reprod_speed = speed;
        }
        if let Some(firemen) = self.firemen {
            config.fireman_quantity = firemen;
        }
        if self.rainy {
            config.rainy_season = true;
        }
    }
}
