//! Construction-time errors.
//!
//! Nothing inside the tick loop fails: out-of-bounds queries resolve to safe
//! defaults and misbehaving actors are removed. These errors only surface when
//! building a simulation from a config or a level description.

use thiserror::Error;

/// Errors raised while configuring or loading a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
    /// Level geometry or setup is inconsistent.
    #[error("invalid level: {0}")]
    InvalidLevel(String),
    /// Config or snapshot (de)serialization failed.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
