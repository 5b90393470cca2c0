//! Bootstrap configuration
//!
//! Optional TOML file with the knobs that cannot change while a session
//! is playing. Every field has a built-in default so the file may be
//! absent entirely; command-line arguments override it.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Bootstrap configuration loaded from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Bytes read from storage per chunk.
    #[serde(default = "default_chunk_bytes")]
    pub chunk_bytes: usize,

    /// Capacity of the FIFO between the reader and the audio callback.
    #[serde(default = "default_sink_buffer_bytes")]
    pub sink_buffer_bytes: usize,

    /// Output device name (None = default device).
    #[serde(default)]
    pub device: Option<String>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_chunk_bytes() -> usize {
    1024
}

fn default_sink_buffer_bytes() -> usize {
    8192
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            chunk_bytes: default_chunk_bytes(),
            sink_buffer_bytes: default_sink_buffer_bytes(),
            device: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: TomlConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("cannot parse {}: {}", path.display(), e)))?;

        if config.chunk_bytes == 0 {
            return Err(Error::Config("chunk_bytes must be non-zero".to_string()));
        }
        if config.sink_buffer_bytes == 0 {
            return Err(Error::Config("sink_buffer_bytes must be non-zero".to_string()));
        }
        Ok(config)
    }
}
