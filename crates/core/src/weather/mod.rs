//! Weather: per-run environment and the rain cloud subsystem

pub mod cloud;
pub mod environment;

pub use cloud::{inject_clouds, spawn_cloud, Cloud};
pub use environment::{Environment, RainSchedule};
