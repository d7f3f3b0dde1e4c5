//! In-memory aggregators shared by the calculator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::db::{AggregatorError, TaxAggregator};
use crate::{DateRange, NewIncomeRecord};

/// Builds an income with net = gross - tax.
pub fn income(
    account_id: i64,
    y: i32,
    m: u32,
    d: u32,
    gross: Decimal,
    tax: Decimal,
) -> NewIncomeRecord {
    NewIncomeRecord {
        account_id,
        received_on: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
        gross_amount: gross,
        tax_amount: tax,
        net_amount: gross - tax,
        description: None,
    }
}

/// Sums a fixed list of incomes; trailing revenue is a configured constant.
pub struct MemoryAggregator {
    incomes: Vec<NewIncomeRecord>,
    trailing: Decimal,
    trailing_as_of: Mutex<Option<NaiveDate>>,
}

impl MemoryAggregator {
    pub fn new(incomes: Vec<NewIncomeRecord>) -> Self {
        Self {
            incomes,
            trailing: Decimal::ZERO,
            trailing_as_of: Mutex::new(None),
        }
    }

    pub fn with_trailing(
        mut self,
        trailing: Decimal,
    ) -> Self {
        self.trailing = trailing;
        self
    }

    /// Date passed to the last trailing revenue query.
    pub fn trailing_as_of(&self) -> Option<NaiveDate> {
        *self.trailing_as_of.lock().unwrap()
    }

    fn sum(
        &self,
        range: &DateRange,
        account_ids: &[i64],
        field: impl Fn(&NewIncomeRecord) -> Decimal,
    ) -> Decimal {
        self.incomes
            .iter()
            .filter(|i| account_ids.contains(&i.account_id) && range.contains(i.received_on))
            .map(field)
            .sum()
    }
}

#[async_trait]
impl TaxAggregator for MemoryAggregator {
    async fn sum_gross(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Ok(self.sum(range, account_ids, |i| i.gross_amount))
    }

    async fn sum_tax(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Ok(self.sum(range, account_ids, |i| i.tax_amount))
    }

    async fn sum_net(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Ok(self.sum(range, account_ids, |i| i.net_amount))
    }

    async fn trailing_12_month_revenue(
        &self,
        account_ids: &[i64],
        as_of: NaiveDate,
    ) -> Result<Decimal, AggregatorError> {
        *self.trailing_as_of.lock().unwrap() = Some(as_of);
        if account_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Ok(self.trailing)
    }
}

/// Every call fails as if the data layer were down.
pub struct FailingAggregator;

#[async_trait]
impl TaxAggregator for FailingAggregator {
    async fn sum_gross(
        &self,
        _range: &DateRange,
        _account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Err(AggregatorError::Connection("ledger offline".to_string()))
    }

    async fn sum_tax(
        &self,
        _range: &DateRange,
        _account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Err(AggregatorError::Connection("ledger offline".to_string()))
    }

    async fn sum_net(
        &self,
        _range: &DateRange,
        _account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        Err(AggregatorError::Connection("ledger offline".to_string()))
    }

    async fn trailing_12_month_revenue(
        &self,
        _account_ids: &[i64],
        _as_of: NaiveDate,
    ) -> Result<Decimal, AggregatorError> {
        Err(AggregatorError::Connection("ledger offline".to_string()))
    }
}
