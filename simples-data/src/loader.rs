use std::collections::BTreeMap;
use std::io::Read;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use simples_core::calculations::TaxCalculator;
use simples_core::calculations::common::round_half_up;
use simples_core::{AggregatorError, BracketTable, DateRange, IncomeStore, NewIncomeRecord};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading income data.
#[derive(Debug, Error)]
pub enum IncomeLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },

    #[error("Repository error: {0}")]
    Repository(#[from] AggregatorError),
}

impl From<csv::Error> for IncomeLoaderError {
    fn from(err: csv::Error) -> Self {
        IncomeLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from the incomes CSV file.
///
/// - `account_id`: owning account
/// - `received_on`: ISO date the payment was received (`2025-03-14`)
/// - `gross_amount`: amount billed
/// - `tax_amount`: tax withheld; empty to have it calculated
/// - `net_amount`: amount kept; empty for `gross - tax`
/// - `description`: free text, optional
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IncomeCsvRecord {
    pub account_id: i64,
    pub received_on: NaiveDate,
    pub gross_amount: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub tax_amount: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub net_amount: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for income data from CSV files.
///
/// Records go through any [`IncomeStore`], so the loader works with every
/// ledger backend.
pub struct IncomeLoader;

impl IncomeLoader {
    /// Parse income records from a CSV reader.
    ///
    /// Negative amounts are rejected with the offending line number.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<IncomeCsvRecord>, IncomeLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for (index, result) in csv_reader.deserialize().enumerate() {
            let record: IncomeCsvRecord = result?;
            // Line 1 is the header.
            validate(&record, index as u64 + 2)?;
            records.push(record);
        }

        Ok(records)
    }

    /// Fill in missing tax and net amounts.
    ///
    /// A missing tax is calculated from the account's gross received in the
    /// twelve months before the record, counting only records in the same
    /// batch with an earlier date. Amounts are rounded to cents. Output keeps
    /// the input order.
    pub fn prepare(
        table: &BracketTable,
        records: &[IncomeCsvRecord],
    ) -> Vec<NewIncomeRecord> {
        let calculator = TaxCalculator::new(table);

        records
            .iter()
            .map(|record| {
                let gross = round_half_up(record.gross_amount);
                let tax = match record.tax_amount {
                    Some(tax) => round_half_up(tax),
                    None => {
                        let revenue_12m = trailing_gross(records, record);
                        let calculation = calculator.calculate_tax(revenue_12m, gross);
                        debug!(
                            account_id = record.account_id,
                            received_on = %record.received_on,
                            %revenue_12m,
                            bracket = calculation.bracket,
                            "Calculated missing tax"
                        );
                        round_half_up(calculation.tax_amount)
                    }
                };
                let net = record
                    .net_amount
                    .map(round_half_up)
                    .unwrap_or(gross - tax);

                NewIncomeRecord {
                    account_id: record.account_id,
                    received_on: record.received_on,
                    gross_amount: gross,
                    tax_amount: tax,
                    net_amount: net,
                    description: record
                        .description
                        .as_ref()
                        .filter(|d| !d.trim().is_empty())
                        .cloned(),
                }
            })
            .collect()
    }

    /// Load incomes into the store.
    ///
    /// Every account present in `incomes` has its existing incomes deleted
    /// before the new ones are inserted, so loading the same file twice
    /// leaves the store unchanged. Returns the number of rows inserted.
    pub async fn load<S: IncomeStore + ?Sized>(
        store: &S,
        incomes: &[NewIncomeRecord],
    ) -> Result<usize, IncomeLoaderError> {
        let mut inserted = 0;

        let mut groups: BTreeMap<i64, Vec<&NewIncomeRecord>> = BTreeMap::new();
        for income in incomes {
            groups.entry(income.account_id).or_default().push(income);
        }

        for (account_id, account_incomes) in groups {
            let deleted = store.delete_account_incomes(account_id).await?;

            for income in account_incomes {
                store.insert_income(income).await?;
                inserted += 1;
            }

            info!(account_id, deleted, "Replaced account incomes");
        }

        Ok(inserted)
    }
}

fn validate(
    record: &IncomeCsvRecord,
    line: u64,
) -> Result<(), IncomeLoaderError> {
    let amounts = [
        ("gross_amount", Some(record.gross_amount)),
        ("tax_amount", record.tax_amount),
        ("net_amount", record.net_amount),
    ];

    for (column, amount) in amounts {
        match amount {
            Some(amount) if amount < Decimal::ZERO => {
                return Err(IncomeLoaderError::InvalidRecord {
                    line,
                    reason: format!("{} must not be negative, got {}", column, amount),
                });
            }
            _ => {}
        }
    }

    Ok(())
}

fn trailing_gross(
    records: &[IncomeCsvRecord],
    record: &IncomeCsvRecord,
) -> Decimal {
    let Some(day_before) = record.received_on.pred_opt() else {
        return Decimal::ZERO;
    };
    let window = DateRange::trailing_12_months(day_before);

    records
        .iter()
        .filter(|r| r.account_id == record.account_id && window.contains(r.received_on))
        .map(|r| round_half_up(r.gross_amount))
        .sum()
}
