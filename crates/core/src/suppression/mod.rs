//! Active fire suppression by mobile ground crews

pub mod firefighter;

pub use firefighter::{step_firefighter, Firefighter};
