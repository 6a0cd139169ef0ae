//! CO2 ledger
//!
//! Running carbon balance of a run. Only burn emissions raise it and only
//! regrowth sequestration lowers it.

use crate::core_types::KgCo2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Co2Ledger {
    emitted: KgCo2,
    sequestered: KgCo2,
    burn_events: u64,
    regrowth_events: u64,
}

impl Co2Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Book the emission of one tree burning out
    pub fn record_emission(&mut self, amount: KgCo2) {
        self.emitted += amount;
        self.burn_events += 1;
    }

    /// Book the uptake of one regrown tree
    pub fn record_sequestration(&mut self, amount: KgCo2) {
        self.sequestered += amount;
        self.regrowth_events += 1;
    }

    /// Net emission: emitted minus sequestered
    pub fn balance(&self) -> KgCo2 {
        self.emitted - self.sequestered
    }

    pub fn emitted(&self) -> KgCo2 {
        self.emitted
    }

    pub fn sequestered(&self) -> KgCo2 {
        self.sequestered
    }

    pub fn burn_events(&self) -> u64 {
        self.burn_events
    }

    pub fn regrowth_events(&self) -> u64 {
        self.regrowth_events
    }
}
