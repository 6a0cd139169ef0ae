//! Forest Fire Simulation Core Library
//!
//! A grid-based wildfire model: fire spreads between neighboring trees under
//! a wind-biased ignition test, lakes and rain clouds suppress it, firebreak
//! corridors amplify it, firefighters put it out, and burned ground regrows
//! toward the biome's density target. A CO2 ledger tracks the net carbon
//! released by burning and taken up by regrowth.
//!
//! ## Running a simulation
//!
//! - [`SimulationConfig`] carries every run option and is validated once
//! - [`Simulation::new`] lays out terrain, vegetation, clouds and firefighters
//! - [`Simulation::step`] runs one random-activation tick and records a
//!   [`TickSnapshot`]
//!
//! All randomness comes from one seeded stream, so a seed and configuration
//! replay bit-identically.

// Core types and utilities
pub mod config;
pub mod core_types;
pub mod error;

// Simulation modules (organized in subfolders)
pub mod grid;
pub mod metrics;
pub mod physics;
pub mod simulation;
pub mod suppression;
pub mod weather;

// Re-export core types
pub use config::{FirePosition, IgnitionMode, SimulationConfig};
pub use core_types::{
    Biome, Connectivity, EntityId, Fraction, KgCo2, Percent, Position, Tree, TreeStatus, Wind,
    WindDirection,
};
pub use error::{Result, SimError};

// Re-export simulation types
pub use grid::{Grid, GroundKind, TerrainLayout, TerrainParams};
pub use metrics::{Co2Ledger, EventCounters, StatusCounts, TickSnapshot};
pub use simulation::{Entity, GroundCover, Registry, Simulation, World};
pub use suppression::Firefighter;
pub use weather::{Cloud, Environment};
