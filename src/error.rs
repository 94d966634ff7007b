//! Smoke engine error handling
//!
//! The simulation core never fails; these errors come from loading scene
//! configuration and from touching resources after teardown.

use std::path::PathBuf;
use thiserror::Error;

/// Result type used across the crate
pub type SmokeResult<T> = Result<T, SmokeError>;

#[derive(Debug, Error)]
pub enum SmokeError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML configuration: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("invalid JSON configuration: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("unknown scene preset '{name}'")]
    UnknownPreset { name: String },

    #[error("invalid texture: {reason}")]
    InvalidTexture { reason: String },

    #[error("{resource} used after dispose")]
    Disposed { resource: &'static str },
}

impl SmokeError {
    /// Create an I/O error bound to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SmokeError::Io {
            path: path.into(),
            source,
        }
    }
}
