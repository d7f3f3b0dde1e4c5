use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{DateRange, IncomeRecord, NewIncomeRecord};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AggregatorError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Summed income figures over an already-scoped set of accounts.
///
/// Implementations return zero for an empty account set without touching
/// storage. Errors are data-layer failures; the core propagates them as-is
/// and never retries.
#[async_trait]
pub trait TaxAggregator: Send + Sync {
    async fn sum_gross(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError>;

    async fn sum_tax(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError>;

    async fn sum_net(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError>;

    /// Gross revenue over the twelve months ending on `as_of`, inclusive.
    async fn trailing_12_month_revenue(
        &self,
        account_ids: &[i64],
        as_of: NaiveDate,
    ) -> Result<Decimal, AggregatorError>;
}

/// Write side of an income ledger.
#[async_trait]
pub trait IncomeStore: Send + Sync {
    async fn insert_income(
        &self,
        income: &NewIncomeRecord,
    ) -> Result<IncomeRecord, AggregatorError>;

    /// Removes every income of `account_id`, returning how many were deleted.
    async fn delete_account_incomes(
        &self,
        account_id: i64,
    ) -> Result<u64, AggregatorError>;

    async fn list_incomes(
        &self,
        account_id: i64,
        range: &DateRange,
    ) -> Result<Vec<IncomeRecord>, AggregatorError>;
}

/// A backend that can both record incomes and aggregate them.
pub trait TaxLedger: TaxAggregator + IncomeStore {}

impl<T: TaxAggregator + IncomeStore + ?Sized> TaxLedger for T {}
