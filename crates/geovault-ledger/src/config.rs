//! Ledger configuration.
//!
//! Host-tunable runtime settings, loadable from TOML. Protocol behavior
//! (credit amounts, the landmark threshold) is deliberately NOT
//! configuration — those are fixed constants in `geovault-types`, identical
//! on every replica.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can arise while loading a [`LedgerConfig`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration for a [`Ledger`](crate::Ledger).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Path of the SQLite database file. `None` keeps all state in memory
    /// (useful for tests and ephemeral replicas).
    #[serde(default)]
    pub db_path: Option<PathBuf>,

    /// Buffer capacity of each notification lane.
    #[serde(default = "default_bus_capacity")]
    pub bus_capacity: usize,
}

fn default_bus_capacity() -> usize {
    geovault_bus::DEFAULT_CAPACITY
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            bus_capacity: default_bus_capacity(),
        }
    }
}

impl LedgerConfig {
    /// Parse a configuration from a TOML string.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_str(&fs::read_to_string(path)?)
    }
}
