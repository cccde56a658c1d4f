//! Errors surfaced by the session driver.

use deckswipe_core::ConfigError;
use kurbo::Size;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Config(#[from] ConfigError),
    #[error("Script viewport must have a positive size, got {0:?}")]
    Viewport(Size),
    #[error("Failed to write summary: {0}")]
    Summary(#[source] serde_json::Error),
}

/// Result type for driver operations.
pub type AppResult<T> = Result<T, AppError>;
