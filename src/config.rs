//! Runtime configuration for Mathesis
//!
//! Settings are resolved in three layers:
//! 1. Built-in defaults
//! 2. An optional TOML file (`mathesis.toml` in the working directory)
//! 3. `MATHESIS_*` environment variables, which win over both

use crate::error::{MathesisError, Result};
use crate::storage::libsql::DEFAULT_EMOTION_WINDOW;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "MATHESIS_DB_PATH";
/// Environment variable overriding the API bind address
pub const API_ADDR_ENV: &str = "MATHESIS_API_ADDR";
/// Environment variable overriding the emotion analysis window
pub const EMOTION_WINDOW_ENV: &str = "MATHESIS_EMOTION_WINDOW";

/// Top-level configuration for the platform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MathesisConfig {
    /// Path to the libsql database file
    pub db_path: String,

    /// Address the HTTP API binds to
    pub api_addr: SocketAddr,

    /// How many recent emotion observations feed each analysis
    pub emotion_window: usize,
}

impl Default for MathesisConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path().to_string_lossy().to_string(),
            api_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            emotion_window: DEFAULT_EMOTION_WINDOW,
        }
    }
}

impl MathesisConfig {
    /// Load configuration from a TOML file, then apply environment overrides.
    ///
    /// Missing keys fall back to their defaults, so a file containing only
    /// `db_path` is valid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let mut config: MathesisConfig = toml::from_str(&raw).map_err(|e| {
            MathesisError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides, with no file.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load `mathesis.toml` from the working directory when present,
    /// otherwise fall back to [`MathesisConfig::from_env`].
    pub fn load() -> Result<Self> {
        let candidate = Path::new("mathesis.toml");
        if candidate.exists() {
            debug!("Loading configuration from {}", candidate.display());
            Self::from_file(candidate)
        } else {
            Self::from_env()
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.is_empty() {
                debug!("Using database path from {}", DB_PATH_ENV);
                self.db_path = path;
            }
        }

        if let Ok(addr) = std::env::var(API_ADDR_ENV) {
            if !addr.is_empty() {
                self.api_addr = addr.parse().map_err(|e| {
                    MathesisError::Config(format!("Invalid {} '{}': {}", API_ADDR_ENV, addr, e))
                })?;
            }
        }

        if let Ok(window) = std::env::var(EMOTION_WINDOW_ENV) {
            if !window.is_empty() {
                self.emotion_window = window.parse().map_err(|e| {
                    MathesisError::Config(format!("Invalid {} '{}': {}", EMOTION_WINDOW_ENV, window, e))
                })?;
            }
        }

        Ok(())
    }
}

/// Default database location under the platform data directory.
///
/// Falls back to the working directory when no data directory is available,
/// which keeps headless containers working.
pub fn default_db_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mathesis")
        .join("mathesis.db")
}
