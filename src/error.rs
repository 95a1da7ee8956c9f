//! Configuration error taxonomy
//!
//! Per-tick simulation code never fails; only lookups and settings loading do.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// Requested a pattern id that is not registered
    #[error("unknown pattern: {0}")]
    UnknownPattern(String),
    /// Requested a weapon id that is not registered
    #[error("unknown weapon: {0}")]
    UnknownWeapon(String),
    /// Settings JSON could not be parsed
    #[error("invalid settings: {0}")]
    Config(#[from] serde_json::Error),
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
}
