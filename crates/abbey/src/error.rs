//! Error types for the abbey crate
//!
//! Only configuration loading can fail. The per-frame simulation is total.

use devices::KeyParseError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for abbey operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building a simulation from configuration
#[derive(Debug, Error)]
pub enum Error {
    /// Config file could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML or has the wrong shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but describes an impossible scene
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// A key binding names a key that does not exist
    #[error("Invalid key binding: {0}")]
    Key(#[from] KeyParseError),
}
