//! Vegetation ("tree") state machine
//!
//! A tree only ever moves forward `Fine -> Burning -> Burned`, with one
//! exception: suppression (rain or a firefighter) reverses `Burning -> Fine`.
//! `Burned` is terminal. Regrowth never revives a burned tree, it spawns a
//! new `Tree` in its place.

use crate::core_types::units::KgCo2;
use serde::{Deserialize, Serialize};

/// Above-ground biomass per unit of canopy size (kg)
pub const BIOMASS_PER_SIZE: f64 = 20.0;

/// Carbon fraction of dry biomass
pub const CARBON_FRACTION: f64 = 0.5;

/// Mass ratio CO2 / C (44/12)
pub const CO2_PER_CARBON: f64 = 3.67;

/// CO2 taken up by a sapling per unit of canopy size at establishment (kg)
pub const SEQUESTRATION_PER_SIZE: f64 = CARBON_FRACTION * CO2_PER_CARBON;

/// Combustion status of a tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TreeStatus {
    Fine,
    Burning,
    Burned,
}

/// A single vegetation cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    status: TreeStatus,
    /// Canopy size drawn from the biome distribution
    pub size: f64,
    /// Visual tag, opaque to the engine
    pub color: Option<String>,
    pub(crate) emitted: KgCo2,
    pub(crate) sequestered: KgCo2,
    /// Tick on which the tree reached `Burned`
    burned_at: Option<u64>,
    /// Times the tree was put out by rain or a firefighter
    extinguished: u32,
}

impl Tree {
    /// New healthy tree
    pub fn new(size: f64, color: Option<String>) -> Self {
        Tree {
            status: TreeStatus::Fine,
            size,
            color,
            emitted: KgCo2::ZERO,
            sequestered: KgCo2::ZERO,
            burned_at: None,
            extinguished: 0,
        }
    }

    /// New tree already on fire (ignition seeding)
    pub fn new_burning(size: f64, color: Option<String>) -> Self {
        let mut tree = Self::new(size, color);
        tree.status = TreeStatus::Burning;
        tree
    }

    #[inline]
    pub fn status(&self) -> TreeStatus {
        self.status
    }

    #[inline]
    pub fn is_fine(&self) -> bool {
        self.status == TreeStatus::Fine
    }

    #[inline]
    pub fn is_burning(&self) -> bool {
        self.status == TreeStatus::Burning
    }

    #[inline]
    pub fn is_burned(&self) -> bool {
        self.status == TreeStatus::Burned
    }

    pub fn emitted(&self) -> KgCo2 {
        self.emitted
    }

    pub fn sequestered(&self) -> KgCo2 {
        self.sequestered
    }

    pub fn burned_at(&self) -> Option<u64> {
        self.burned_at
    }

    pub fn times_extinguished(&self) -> u32 {
        self.extinguished
    }

    /// CO2 released when this tree burns completely
    pub fn burn_emission(&self, co2_factor: f64) -> KgCo2 {
        KgCo2::new(self.size * BIOMASS_PER_SIZE * CARBON_FRACTION * CO2_PER_CARBON * co2_factor)
    }

    /// `Fine -> Burning`. Returns whether the transition happened.
    pub fn ignite(&mut self) -> bool {
        if self.status == TreeStatus::Fine {
            self.status = TreeStatus::Burning;
            true
        } else {
            false
        }
    }

    /// `Burning -> Burned`, booking `emission` on the tree.
    pub fn burn_out(&mut self, tick: u64, emission: KgCo2) -> bool {
        if self.status == TreeStatus::Burning {
            self.status = TreeStatus::Burned;
            self.burned_at = Some(tick);
            self.emitted += emission;
            true
        } else {
            false
        }
    }

    /// `Burning -> Fine`. Accumulators are kept: the tree did not combust.
    pub fn extinguish(&mut self) -> bool {
        if self.status == TreeStatus::Burning {
            self.status = TreeStatus::Fine;
            self.extinguished += 1;
            true
        } else {
            false
        }
    }

    /// Book the uptake of a freshly grown tree and return it.
    pub(crate) fn record_sequestration(&mut self) -> KgCo2 {
        let uptake = KgCo2::new(self.size * SEQUESTRATION_PER_SIZE);
        self.sequestered += uptake;
        uptake
    }
}
