//! Fleet configuration.
//!
//! Loaded from a TOML file. Every key is optional:
//!
//! ```toml
//! top-movers-limit = 10
//! mission-log-path = "var/missions.jsonl"
//! log-level = "debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Fleet configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct FleetConfig {
    /// Default cap for the ranking query. Unset means unlimited.
    pub top_movers_limit: Option<usize>,
    /// When set, the mission log is a JSON-lines file at this path.
    pub mission_log_path: Option<PathBuf>,
    /// Fallback filter directive when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            top_movers_limit: None,
            mission_log_path: None,
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl FleetConfig {
    /// Load and validate config from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_movers_limit == Some(0) {
            return Err(ConfigError::Invalid(
                "top-movers-limit must be greater than zero".into(),
            ));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log-level must not be empty".into()));
        }
        Ok(())
    }
}
