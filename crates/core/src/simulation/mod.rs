//! Simulation run: construction, stepping and read-only queries
//!
//! [`Simulation`] owns the [`World`] (grid, registry, RNG, ledger, counters,
//! environment) plus the per-tick snapshot history. Construction validates
//! the configuration, lays out terrain and vegetation, seeds the initial
//! fire, then adds clouds and firefighters. Each [`Simulation::step`] runs
//! one scheduler tick and records a [`TickSnapshot`].

pub mod context;
pub mod entity;
pub mod ignition;
pub mod registry;
pub mod scheduler;

pub use context::World;
pub use entity::{Corridor, Entity, GroundCover, GroundEntity};
pub use ignition::ignition_points;
pub use registry::Registry;

use crate::config::SimulationConfig;
use crate::core_types::{EntityId, KgCo2, Position, Tree, TreeStatus};
use crate::error::{Result, SimError};
use crate::grid::{Grid, GroundKind, TerrainFeature, TerrainLayout};
use crate::metrics::{Co2Ledger, EventCounters, TickSnapshot};
use crate::suppression::Firefighter;
use crate::weather::cloud::{inject_clouds, spawn_cloud};
use crate::weather::Environment;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

pub struct Simulation {
    config: SimulationConfig,
    world: World,
    history: Vec<TickSnapshot>,
    fire_out_logged: bool,
}

impl Simulation {
    /// Empty world: no ground occupants, no clouds, no firefighters.
    ///
    /// The configuration is validated exactly as in [`Simulation::new`].
    /// Used to hand-build scenarios with the `add_*` methods.
    pub fn blank(config: &SimulationConfig) -> Result<Self> {
        let env = Environment::from_config(config)?;
        let grid = Grid::new(config.width, config.height, config.max_aerial_per_cell)?;
        let world = World {
            grid,
            registry: Registry::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            ledger: Co2Ledger::new(),
            counters: EventCounters::default(),
            env,
            tick: 0,
        };
        Ok(Simulation {
            config: config.clone(),
            world,
            history: Vec::new(),
            fire_out_logged: false,
        })
    }

    /// Build and populate a run from `config`
    pub fn new(config: &SimulationConfig) -> Result<Self> {
        let mut sim = Self::blank(config)?;
        sim.populate()?;
        sim.history.push(sim.snapshot());

        let counts = sim.snapshot().counts;
        info!(
            width = config.width,
            height = config.height,
            biome = %sim.world.env.biome.name,
            seed = config.seed,
            fine = counts.fine,
            burning = counts.burning,
            lakes = counts.lakes,
            corridors = counts.corridors,
            obstacles = counts.obstacles,
            clouds = counts.clouds,
            firefighters = counts.firefighters,
            "simulation initialized"
        );
        Ok(sim)
    }

    fn populate(&mut self) -> Result<()> {
        let config = &self.config;
        let world = &mut self.world;
        let (width, height) = (config.width, config.height);

        let layout = TerrainLayout::generate(width, height, &config.terrain()?, &mut world.rng)?;
        let ignition = if config.fire_enabled {
            ignition_points(config.ignition_mode()?, width, height, &mut world.rng)
        } else {
            FxHashSet::default()
        };

        let density = *world.env.density_target();
        let radius = world.env.corridor_spread_radius;
        for pos in world.grid.positions().collect::<Vec<_>>() {
            let cover = match layout.feature_at(pos) {
                Some(TerrainFeature::Lake) => GroundCover::Lake,
                Some(TerrainFeature::Corridor) => GroundCover::Corridor(Corridor::new(radius)),
                Some(TerrainFeature::Obstacle) => GroundCover::Obstacle,
                None if world.rng.random_bool(density) => {
                    let size = world.env.biome.canopy_size.sample(&mut world.rng);
                    let color = world.env.biome.color.clone();
                    GroundCover::Vegetation(if ignition.contains(&pos) {
                        Tree::new_burning(size, color)
                    } else {
                        Tree::new(size, color)
                    })
                }
                None => GroundCover::Bare,
            };
            spawn_or_skip(world, Entity::ground(pos, cover));
        }

        let placed = inject_clouds(world, config.cloud_quantity);
        if placed < config.cloud_quantity {
            warn!(requested = config.cloud_quantity, placed, "some initial clouds were skipped");
        }

        let walkable: Vec<Position> = world
            .grid
            .positions()
            .filter(|&p| matches!(world.ground_kind(p), Some(GroundKind::Bare | GroundKind::Vegetation)))
            .collect();
        for _ in 0..config.fireman_quantity {
            let Some(&pos) = walkable.choose(&mut world.rng) else {
                warn!("no bare or vegetated cell for a firefighter");
                break;
            };
            spawn_or_skip(world, Entity::Firefighter(Firefighter::new(pos)));
        }
        Ok(())
    }

    /// Run one tick and record its snapshot
    pub fn step(&mut self) -> &TickSnapshot {
        // Hand-built worlds record their starting state on the first step
        if self.history.is_empty() {
            self.history.push(self.snapshot());
        }
        scheduler::run_tick(&mut self.world);
        let snapshot = self.snapshot();
        debug!(
            tick = snapshot.tick,
            fine = snapshot.counts.fine,
            burning = snapshot.counts.burning,
            burned = snapshot.counts.burned,
            clouds = snapshot.counts.clouds,
            co2 = snapshot.co2_balance,
            "tick"
        );
        if snapshot.counts.burning == 0 && !self.fire_out_logged && snapshot.counts.burned > 0 {
            info!(tick = snapshot.tick, burned = snapshot.counts.burned, "fire is out");
            self.fire_out_logged = true;
        } else if snapshot.counts.burning > 0 {
            self.fire_out_logged = false;
        }
        self.history.push(snapshot);
        &self.history[self.history.len() - 1]
    }

    /// Run `ticks` ticks
    pub fn run(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
    }

    /// Run until nothing burns or `max_ticks` elapse. Returns ticks run.
    pub fn run_until_fire_out(&mut self, max_ticks: u64) -> u64 {
        let mut ran = 0;
        while ran < max_ticks && !self.is_fire_out() {
            self.step();
            ran += 1;
        }
        ran
    }

    /// Snapshot of the current state
    #[must_use]
    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot::capture(
            self.world.tick,
            &self.world.registry,
            &self.world.ledger,
            self.world.counters,
        )
    }

    /// Every recorded snapshot, the initial state first.
    ///
    /// A world from [`Simulation::blank`] has no history until its first step.
    #[must_use]
    pub fn history(&self) -> &[TickSnapshot] {
        &self.history
    }

    /// No vegetation is burning
    #[must_use]
    pub fn is_fire_out(&self) -> bool {
        !self
            .world
            .registry
            .iter()
            .any(|(_, e)| e.as_tree().is_some_and(Tree::is_burning))
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.world.tick
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.world.grid
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.world.registry
    }

    #[must_use]
    pub fn ledger(&self) -> &Co2Ledger {
        &self.world.ledger
    }

    #[must_use]
    pub fn counters(&self) -> EventCounters {
        self.world.counters
    }

    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.world.env
    }

    /// Vegetation at `pos`
    #[must_use]
    pub fn tree_at(&self, pos: Position) -> Option<&Tree> {
        self.world.tree_at(pos).map(|(_, tree)| tree)
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct mutable access for driving single behaviors
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Put vegetation with `status` at `pos`, replacing any ground occupant.
    ///
    /// A tree placed as `Burned` carries no emission; nothing is booked on
    /// the ledger.
    pub fn add_tree(&mut self, pos: Position, status: TreeStatus) -> Result<EntityId> {
        let size = self.world.env.biome.canopy_size.sample(&mut self.world.rng);
        let color = self.world.env.biome.color.clone();
        let tree = match status {
            TreeStatus::Fine => Tree::new(size, color),
            TreeStatus::Burning => Tree::new_burning(size, color),
            TreeStatus::Burned => {
                let mut tree = Tree::new_burning(size, color);
                tree.burn_out(self.world.tick, KgCo2::ZERO);
                tree
            }
        };
        self.world.replace_ground(pos, GroundCover::Vegetation(tree))
    }

    pub fn add_bare(&mut self, pos: Position) -> Result<EntityId> {
        self.world.replace_ground(pos, GroundCover::Bare)
    }

    pub fn add_lake(&mut self, pos: Position) -> Result<EntityId> {
        self.world.replace_ground(pos, GroundCover::Lake)
    }

    /// Corridor with the configured spread radius
    pub fn add_corridor(&mut self, pos: Position) -> Result<EntityId> {
        let radius = self.world.env.corridor_spread_radius;
        self.world
            .replace_ground(pos, GroundCover::Corridor(Corridor::new(radius)))
    }

    pub fn add_obstacle(&mut self, pos: Position) -> Result<EntityId> {
        self.world.replace_ground(pos, GroundCover::Obstacle)
    }

    pub fn add_cloud(&mut self, pos: Position, size: u32) -> Result<EntityId> {
        spawn_cloud(&mut self.world, pos, size)
    }

    pub fn add_firefighter(&mut self, pos: Position) -> Result<EntityId> {
        self.world.spawn(Entity::Firefighter(Firefighter::new(pos)))
    }

    /// Cover every cell without a ground occupant with bare ground
    pub fn fill_bare(&mut self) -> Result<()> {
        for pos in self.world.grid.positions().collect::<Vec<_>>() {
            if self.world.grid.ground_at(pos).is_none() {
                self.world.spawn(Entity::ground(pos, GroundCover::Bare))?;
            }
        }
        Ok(())
    }
}

/// Spawn during initialization; an occupied cell skips the candidate
fn spawn_or_skip(world: &mut World, entity: Entity) {
    let pos = entity.pos();
    match world.spawn(entity) {
        Ok(_) => {}
        Err(err @ SimError::OccupiedCell { .. }) => warn!(%pos, %err, "initial placement skipped"),
        Err(err) => warn!(%pos, %err, "initial placement failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> SimulationConfig {
        SimulationConfig {
            width: 20,
            height: 15,
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_every_cell_gets_a_ground_occupant() {
        let config = SimulationConfig {
            water_density: 0.1,
            corridor: true,
            corridor_density: 0.05,
            obstacles: true,
            obstacles_density: 0.05,
            ..small_config()
        };
        let sim = Simulation::new(&config).unwrap();
        let grid = sim.grid();
        assert!(grid.positions().all(|p| grid.ground_at(p).is_some()));

        let counts = sim.snapshot().counts;
        assert_eq!(
            counts.vegetation() + counts.bare + counts.lakes + counts.corridors + counts.obstacles,
            grid.area()
        );
        assert!(counts.lakes > 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            biome_name: "Tundra".to_string(),
            ..small_config()
        };
        assert!(matches!(
            Simulation::new(&config),
            Err(SimError::Configuration { .. })
        ));
    }

    #[test]
    fn test_directional_fire_only_on_left_column() {
        let config = SimulationConfig {
            random_fire: false,
            position_fire: "Left".to_string(),
            tree_density: 1.0,
            ..small_config()
        };
        let sim = Simulation::new(&config).unwrap();
        for (_, entity) in sim.registry().iter() {
            if entity.as_tree().is_some_and(Tree::is_burning) {
                assert_eq!(entity.pos().x, 0);
            }
        }
        assert_eq!(sim.snapshot().counts.burning, 15);
    }

    #[test]
    fn test_history_starts_with_initial_state() {
        let mut sim = Simulation::new(&small_config()).unwrap();
        sim.run(3);
        let ticks: Vec<u64> = sim.history().iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_clouds_and_firefighters_are_placed() {
        let config = SimulationConfig {
            cloud_quantity: 3,
            fireman_quantity: 2,
            ..small_config()
        };
        let sim = Simulation::new(&config).unwrap();
        let counts = sim.snapshot().counts;
        assert!(counts.clouds > 0 && counts.clouds <= 3);
        assert_eq!(counts.firefighters, 2);
    }
}
