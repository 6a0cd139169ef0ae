//! Grid occupancy and terrain layout

pub mod forest_grid;
pub mod terrain;

// Re-export main types
pub use forest_grid::*;
pub use terrain::*;
