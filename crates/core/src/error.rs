//! Error taxonomy for the forest fire engine
//!
//! Configuration problems are fatal at construction time. Placement errors are
//! returned to the caller of the explicit grid operations, while the
//! initialization and regrowth routines treat `OccupiedCell` as "skip this
//! candidate".

use crate::core_types::EntityId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Invalid or unknown configuration value, detected before the run starts
    #[error("Configuration error in '{field}': {message}")]
    Configuration {
        /// Name of the offending option (e.g. `"width"`, `"biome_name"`)
        field: String,
        /// Description of the violated constraint
        message: String,
    },

    /// A position outside `[0, width) x [0, height)`
    #[error("Position ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    /// Ground-layer conflict, or the aerial layer is at capacity
    #[error("Cell ({x}, {y}) is already occupied")]
    OccupiedCell { x: i32, y: i32 },

    /// The registry holds no live entity with this identity
    #[error("Entity not found: {0}")]
    UnknownEntity(EntityId),
}

impl SimError {
    /// Create a configuration error for `field`.
    pub fn config(field: &str, message: impl Into<String>) -> Self {
        SimError::Configuration {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_problem() {
        let err = SimError::config("width", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "Configuration error in 'width': must be positive, got 0"
        );

        let err = SimError::OutOfBounds {
            x: -1,
            y: 3,
            width: 10,
            height: 10,
        };
        assert!(err.to_string().contains("(-1, 3)"));
    }
}
