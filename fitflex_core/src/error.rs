//! Error types for the fitflex_core library.

use crate::timer::TimerState;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for fitflex_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// A workout id that is not in the catalog
    #[error("Unknown workout: {0}")]
    UnknownWorkout(String),

    /// BMI requested without a usable height or weight
    #[error("Please enter height & weight.")]
    MissingMeasurement,

    /// Timer action not allowed in the current state
    #[error("Cannot {action} while timer is {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: TimerState,
    },

    /// Generic error
    #[error("{0}")]
    Other(String),
}
