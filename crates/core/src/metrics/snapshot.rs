//! Per-tick aggregate counts
//!
//! Counting is a read-only scan over the live registry entries, so it runs on rayon;
//! integer counts merge identically in any order.

use crate::core_types::TreeStatus;
use crate::metrics::{Co2Ledger, EventCounters};
use crate::simulation::entity::{Entity, GroundCover};
use crate::simulation::registry::Registry;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Entity counts by kind and status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCounts {
    pub fine: usize,
    pub burning: usize,
    pub burned: usize,
    pub bare: usize,
    pub lakes: usize,
    pub corridors: usize,
    pub burned_corridors: usize,
    pub obstacles: usize,
    pub clouds: usize,
    pub full_clouds: usize,
    pub firefighters: usize,
}

impl StatusCounts {
    fn add_entity(mut self, entity: &Entity) -> Self {
        match entity {
            Entity::Ground(ground) => match &ground.cover {
                GroundCover::Vegetation(tree) => match tree.status() {
                    TreeStatus::Fine => self.fine += 1,
                    TreeStatus::Burning => self.burning += 1,
                    TreeStatus::Burned => self.burned += 1,
                },
                GroundCover::Bare => self.bare += 1,
                GroundCover::Lake => self.lakes += 1,
                GroundCover::Corridor(corridor) => {
                    self.corridors += 1;
                    if corridor.is_burned() {
                        self.burned_corridors += 1;
                    }
                }
                GroundCover::Obstacle => self.obstacles += 1,
            },
            Entity::Cloud(cloud) => {
                self.clouds += 1;
                if cloud.full {
                    self.full_clouds += 1;
                }
            }
            Entity::Firefighter(_) => self.firefighters += 1,
        }
        self
    }

    fn merge(self, other: Self) -> Self {
        StatusCounts {
            fine: self.fine + other.fine,
            burning: self.burning + other.burning,
            burned: self.burned + other.burned,
            bare: self.bare + other.bare,
            lakes: self.lakes + other.lakes,
            corridors: self.corridors + other.corridors,
            burned_corridors: self.burned_corridors + other.burned_corridors,
            obstacles: self.obstacles + other.obstacles,
            clouds: self.clouds + other.clouds,
            full_clouds: self.full_clouds + other.full_clouds,
            firefighters: self.firefighters + other.firefighters,
        }
    }

    /// Count every live entity in `registry`
    pub fn collect(registry: &Registry) -> Self {
        registry
            .par_entities()
            .fold(StatusCounts::default, StatusCounts::add_entity)
            .reduce(StatusCounts::default, StatusCounts::merge)
    }

    /// Vegetation cells of any status
    pub fn vegetation(&self) -> usize {
        self.fine + self.burning + self.burned
    }
}

/// Everything a host reports for one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: u64,
    pub counts: StatusCounts,
    /// Cumulative kg CO2 released by burning
    pub emitted: f64,
    /// Cumulative kg CO2 taken up by regrowth
    pub sequestered: f64,
    /// `emitted - sequestered`
    pub co2_balance: f64,
    pub events: EventCounters,
}

impl TickSnapshot {
    pub fn capture(tick: u64, registry: &Registry, ledger: &Co2Ledger, events: EventCounters) -> Self {
        TickSnapshot {
            tick,
            counts: StatusCounts::collect(registry),
            emitted: *ledger.emitted(),
            sequestered: *ledger.sequestered(),
            co2_balance: *ledger.balance(),
            events,
        }
    }
}
