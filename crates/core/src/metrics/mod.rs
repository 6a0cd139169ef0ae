//! Metrics: CO2 ledger, event counters and per-tick snapshots
//!
//! Everything here is read by the host through accessor queries; no
//! serialization format is imposed by the core.

pub mod ledger;
pub mod snapshot;

pub use ledger::Co2Ledger;
pub use snapshot::{StatusCounts, TickSnapshot};

use serde::{Deserialize, Serialize};

/// Cumulative counts of discrete events that leave no trace in entity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EventCounters {
    /// Burning trees put out by rain
    pub rain_extinguished: u64,
    /// Burning trees put out by firefighters
    pub firefighter_extinguished: u64,
    /// Trees forced to `Burned` next to a lake
    pub lake_suppressed: u64,
    /// Corridors that caught fire
    pub corridor_flashovers: u64,
    /// Trees ignited by neighbors or corridors
    pub ignitions: u64,
    /// Clouds absorbed by another cloud
    pub cloud_merges: u64,
    /// Clouds that left the grid
    pub clouds_exited: u64,
    /// Burned trees cleared to bare ground
    pub burned_cleared: u64,
}
