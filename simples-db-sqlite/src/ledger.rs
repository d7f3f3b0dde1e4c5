use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use simples_core::{
    AggregatorError, DateRange, IncomeRecord, IncomeStore, NewIncomeRecord, TaxAggregator,
};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use tracing::debug;

use crate::decimal::{get_money, money_to_f64};

/// Income ledger over the SQLite `incomes` table.
pub struct SqliteLedger {
    pool: SqlitePool,
}

/// Summable money columns of `incomes`.
#[derive(Debug, Clone, Copy)]
enum AmountColumn {
    Gross,
    Tax,
    Net,
}

impl AmountColumn {
    fn name(self) -> &'static str {
        match self {
            AmountColumn::Gross => "gross_amount",
            AmountColumn::Tax => "tax_amount",
            AmountColumn::Net => "net_amount",
        }
    }
}

impl SqliteLedger {
    /// Opens `database_url`, creating the database file when missing.
    ///
    /// Accepts sqlx URLs (`sqlite:incomes.db`), bare paths and `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database url: {}", database_url))?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn sum_column(
        &self,
        column: AmountColumn,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        if account_ids.is_empty() {
            return Ok(Decimal::ZERO);
        }

        let placeholders = vec!["?"; account_ids.len()].join(", ");
        let sql = format!(
            "SELECT ROUND(COALESCE(SUM({}), 0), 2) AS total
             FROM incomes
             WHERE received_on BETWEEN ? AND ? AND account_id IN ({})",
            column.name(),
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(range.start).bind(range.end);
        for id in account_ids {
            query = query.bind(*id);
        }

        let row = query
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AggregatorError::Database(e.to_string()))?;

        let total = get_money(&row, "total")?;
        debug!(
            column = column.name(),
            start = %range.start,
            end = %range.end,
            accounts = account_ids.len(),
            %total,
            "Summed incomes"
        );
        Ok(total)
    }

    async fn get_income(
        &self,
        id: i64,
    ) -> Result<IncomeRecord, AggregatorError> {
        let row = sqlx::query(
            "SELECT id, account_id, received_on, gross_amount, tax_amount, net_amount, description
             FROM incomes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AggregatorError::Database(e.to_string()))?
        .ok_or(AggregatorError::NotFound)?;

        row_to_income(&row)
    }
}

fn row_to_income(row: &sqlx::sqlite::SqliteRow) -> Result<IncomeRecord, AggregatorError> {
    Ok(IncomeRecord {
        id: row
            .try_get("id")
            .map_err(|e| AggregatorError::Database(e.to_string()))?,
        account_id: row
            .try_get("account_id")
            .map_err(|e| AggregatorError::Database(e.to_string()))?,
        received_on: row
            .try_get::<NaiveDate, _>("received_on")
            .map_err(|e| AggregatorError::Database(format!("Failed to get received_on: {}", e)))?,
        gross_amount: get_money(row, "gross_amount")?,
        tax_amount: get_money(row, "tax_amount")?,
        net_amount: get_money(row, "net_amount")?,
        description: row
            .try_get("description")
            .map_err(|e| AggregatorError::Database(e.to_string()))?,
    })
}

#[async_trait]
impl TaxAggregator for SqliteLedger {
    async fn sum_gross(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        self.sum_column(AmountColumn::Gross, range, account_ids)
            .await
    }

    async fn sum_tax(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        self.sum_column(AmountColumn::Tax, range, account_ids)
            .await
    }

    async fn sum_net(
        &self,
        range: &DateRange,
        account_ids: &[i64],
    ) -> Result<Decimal, AggregatorError> {
        self.sum_column(AmountColumn::Net, range, account_ids)
            .await
    }

    async fn trailing_12_month_revenue(
        &self,
        account_ids: &[i64],
        as_of: NaiveDate,
    ) -> Result<Decimal, AggregatorError> {
        let range = DateRange::trailing_12_months(as_of);
        self.sum_column(AmountColumn::Gross, &range, account_ids)
            .await
    }
}

#[async_trait]
impl IncomeStore for SqliteLedger {
    async fn insert_income(
        &self,
        income: &NewIncomeRecord,
    ) -> Result<IncomeRecord, AggregatorError> {
        let result = sqlx::query(
            "INSERT INTO incomes (
                account_id, received_on, gross_amount, tax_amount, net_amount, description
            ) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(income.account_id)
        .bind(income.received_on)
        .bind(money_to_f64(income.gross_amount))
        .bind(money_to_f64(income.tax_amount))
        .bind(money_to_f64(income.net_amount))
        .bind(income.description.as_deref())
        .execute(&self.pool)
        .await
        .map_err(|e| AggregatorError::Database(e.to_string()))?;

        self.get_income(result.last_insert_rowid())
            .await
    }

    async fn delete_account_incomes(
        &self,
        account_id: i64,
    ) -> Result<u64, AggregatorError> {
        let result = sqlx::query("DELETE FROM incomes WHERE account_id = ?")
            .bind(account_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AggregatorError::Database(e.to_string()))?;

        Ok(result.rows_affected())
    }

    async fn list_incomes(
        &self,
        account_id: i64,
        range: &DateRange,
    ) -> Result<Vec<IncomeRecord>, AggregatorError> {
        let rows = sqlx::query(
            "SELECT id, account_id, received_on, gross_amount, tax_amount, net_amount, description
             FROM incomes
             WHERE account_id = ? AND received_on BETWEEN ? AND ?
             ORDER BY received_on, id",
        )
        .bind(account_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AggregatorError::Database(e.to_string()))?;

        rows.iter().map(row_to_income).collect()
    }
}
