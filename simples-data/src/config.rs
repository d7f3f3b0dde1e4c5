//! `simples.toml` settings.
//!
//! ```toml
//! [database]
//! backend = "sqlite"
//! connection_string = "simples.db"
//!
//! [contribution]
//! base = 15000.00
//! ceiling = 7786.02
//! rate = 0.11
//!
//! [logging]
//! level = "info"
//! file = "simples.log"
//! ```
//!
//! Every section is optional. Without `[contribution]` no social
//! contribution is computed.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use simples_core::db::DbConfig;
use simples_core::{ContributionConfig, ContributionConfigError};
use thiserror::Error;

/// File read when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "simples.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid contribution settings: {0}")]
    Contribution(#[from] ContributionConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Bare level or any `EnvFilter` directive. `RUST_LOG` takes precedence.
    pub level: String,

    /// Appends log output to this file when set.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: DbConfig,
    pub contribution: Option<ContributionConfig>,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        if let Some(contribution) = &config.contribution {
            contribution.validate()?;
        }
        Ok(config)
    }

    /// Reads the config file at `path`.
    ///
    /// With no explicit path, [`DEFAULT_CONFIG_FILE`] is read when present and
    /// defaults are used otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }
}
