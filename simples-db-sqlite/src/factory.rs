use async_trait::async_trait;

use simples_core::AggregatorError;
use simples_core::TaxLedger;
use simples_core::db::{DbConfig, LedgerFactory};

use crate::ledger::SqliteLedger;

/// [`LedgerFactory`] for SQLite.
///
/// Register this with a [`simples_core::db::LedgerRegistry`] to make the
/// `"sqlite"` backend available:
///
/// ```rust,no_run
/// use simples_core::db::LedgerRegistry;
/// use simples_db_sqlite::SqliteLedgerFactory;
///
/// let mut registry = LedgerRegistry::new();
/// registry.register(Box::new(SqliteLedgerFactory));
/// ```
pub struct SqliteLedgerFactory;

#[async_trait]
impl LedgerFactory for SqliteLedgerFactory {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    /// Opens the database named by `config.connection_string` and applies
    /// pending migrations.
    ///
    /// Accepted values are a bare file path such as `"incomes.db"` (created
    /// if missing), a sqlx URL, or `":memory:"`.
    async fn create(
        &self,
        config: &DbConfig,
    ) -> Result<Box<dyn TaxLedger>, AggregatorError> {
        let ledger = SqliteLedger::new(&config.connection_string)
            .await
            .map_err(|e| AggregatorError::Connection(format!("{:#}", e)))?;
        ledger
            .run_migrations()
            .await
            .map_err(|e| AggregatorError::Database(format!("{:#}", e)))?;
        Ok(Box::new(ledger))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use simples_core::{DateRange, TaxAggregator};
    use simples_core::db::{DbConfig, LedgerFactory, LedgerRegistry};

    use super::SqliteLedgerFactory;

    #[test]
    fn backend_name_is_sqlite() {
        assert_eq!(SqliteLedgerFactory.backend_name(), "sqlite");
    }

    #[tokio::test]
    async fn creates_in_memory_ledger() {
        let config = DbConfig {
            backend: "sqlite".to_string(),
            connection_string: ":memory:".to_string(),
        };

        let ledger = SqliteLedgerFactory
            .create(&config)
            .await
            .expect("failed to create in-memory ledger");

        let total = ledger
            .sum_gross(&DateRange::year(2025).unwrap(), &[1])
            .await
            .expect("fresh ledger should aggregate");
        assert_eq!(total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn registry_resolves_sqlite_backend() {
        let mut registry = LedgerRegistry::new();
        registry.register(Box::new(SqliteLedgerFactory));

        let result = registry
            .create(&DbConfig::new("sqlite", ":memory:"))
            .await;

        assert!(
            result.is_ok(),
            "failed to create ledger through registry: {:#?}",
            result.err()
        );
    }
}
