//! Fire/regrowth engine: per-turn rules for vegetation and corridors

pub mod propagation;
pub mod regrowth;

pub use propagation::{flash_corridor, step_burning};
pub use regrowth::{can_grow, local_density, step_fine};
