//! Error types for wavloop
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use crate::wav::FormatViolation;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for wavloop
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Audio file could not be opened
    #[error("Failed to open {}: {}", path.display(), source)]
    StorageOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File ended before a complete 44-byte header could be read
    #[error("File too short to hold a WAV header")]
    TruncatedHeader,

    /// Header parsed but violates a format rule
    #[error("Invalid WAV header: {0}")]
    InvalidHeader(#[from] FormatViolation),

    /// Read error while streaming sample data
    #[error("Storage read error: {0}")]
    StorageRead(#[source] std::io::Error),

    /// Audio output device errors
    #[error("Audio output error: {0}")]
    AudioOutput(String),
}

/// Convenience Result type using wavloop Error
pub type Result<T> = std::result::Result<T, Error>;
