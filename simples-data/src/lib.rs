//! Income import, configuration and logging for the `simples` command.

pub mod config;
pub mod logging;
mod loader;

pub use config::{AppConfig, ConfigError, LoggingConfig};
pub use loader::{IncomeCsvRecord, IncomeLoader, IncomeLoaderError};
