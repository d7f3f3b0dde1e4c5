use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::aggregator::{AggregatorError, TaxLedger};

/// Backend used when none is configured.
pub const DEFAULT_BACKEND: &str = "sqlite";

/// Ledger location used when none is configured.
pub const DEFAULT_CONNECTION_STRING: &str = "simples.db";

/// Which ledger backend to open and where.
///
/// Missing fields take their defaults one by one, so a config naming only
/// the backend still points at `simples.db`. Use `":memory:"` for a
/// throwaway SQLite ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    pub backend: String,
    pub connection_string: String,
}

impl DbConfig {
    pub fn new(
        backend: &str,
        connection_string: &str,
    ) -> Self {
        Self {
            backend: backend.to_string(),
            connection_string: connection_string.to_string(),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND, DEFAULT_CONNECTION_STRING)
    }
}

/// Opens one kind of ledger. Migrations, if any, run inside `create`.
#[async_trait]
pub trait LedgerFactory: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn create(&self, config: &DbConfig) -> Result<Box<dyn TaxLedger>, AggregatorError>;
}

/// Ledger factories keyed by backend name.
#[derive(Default)]
pub struct LedgerRegistry {
    factories: HashMap<&'static str, Box<dyn LedgerFactory>>,
}

impl LedgerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations under the same name win.
    pub fn register(&mut self, factory: Box<dyn LedgerFactory>) {
        self.factories.insert(factory.backend_name(), factory);
    }

    pub fn available_backends(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Opens the ledger named by `config.backend`.
    ///
    /// An unregistered backend is a [`AggregatorError::Configuration`] error
    /// listing what is available.
    pub async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxLedger>, AggregatorError> {
        let factory = self
            .factories
            .get(config.backend.as_str())
            .ok_or_else(|| {
                AggregatorError::Configuration(format!(
                    "unknown backend '{}'; available: {:?}",
                    config.backend,
                    self.available_backends()
                ))
            })?;

        factory.create(config).await
    }
}
