//! Core types and utilities

pub mod biome;
pub mod position;
pub mod units;
pub mod vegetation;
pub mod wind;

pub use biome::{Biome, SizeDistribution};
pub use position::{Connectivity, EntityId, Offset, Position, RING_TWO_OFFSETS};
pub use units::{Fraction, KgCo2, Percent};
pub use vegetation::{Tree, TreeStatus};
pub use wind::{Wind, WindDirection};
