use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use simples_core::AggregatorError;
use simples_core::calculations::common::round_half_up;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a money column, accepting SQLite INTEGER, REAL and NULL values.
///
/// NULL reads as zero, which is what `SUM` over no rows produces.
pub fn get_money(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, AggregatorError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| AggregatorError::Database(format!("Column '{}' not found: {}", column, e)))?;

    let type_info = value_ref.type_info();
    let type_name = type_info.name();

    match type_name {
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                AggregatorError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                AggregatorError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            Decimal::try_from(val).map_err(|e| {
                AggregatorError::Database(format!("Failed to convert {} to Decimal: {}", val, e))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        _ => Err(AggregatorError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Converts an amount to the REAL stored in SQLite, rounded to cents.
pub fn money_to_f64(d: Decimal) -> f64 {
    round_half_up(d).to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    use super::*;

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE amounts (
                id INTEGER PRIMARY KEY,
                amount REAL,
                label TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create test table");
        pool
    }

    async fn fetch(
        pool: &SqlitePool,
        sql: &str,
    ) -> sqlx::sqlite::SqliteRow {
        sqlx::query(sql)
            .fetch_one(pool)
            .await
            .expect("Failed to fetch row")
    }

    // get_money tests

    #[tokio::test]
    async fn test_get_money_from_real() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO amounts (id, amount) VALUES (1, 773.33)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT amount FROM amounts WHERE id = 1").await;

        assert_eq!(get_money(&row, "amount"), Ok(dec!(773.33)));
    }

    #[tokio::test]
    async fn test_get_money_from_integer_expression() {
        let pool = setup_test_db().await;

        let row = fetch(&pool, "SELECT 180000 AS amount").await;

        assert_eq!(get_money(&row, "amount"), Ok(dec!(180000)));
    }

    #[tokio::test]
    async fn test_get_money_from_empty_sum_is_zero() {
        let pool = setup_test_db().await;

        let row = fetch(&pool, "SELECT SUM(amount) AS total FROM amounts").await;

        assert_eq!(get_money(&row, "total"), Ok(Decimal::ZERO));
    }

    #[tokio::test]
    async fn test_get_money_rounded_sum() {
        let pool = setup_test_db().await;
        sqlx::query("INSERT INTO amounts (id, amount) VALUES (1, 0.1), (2, 0.2)")
            .execute(&pool)
            .await
            .expect("Failed to insert test data");

        let row = fetch(&pool, "SELECT ROUND(SUM(amount), 2) AS total FROM amounts").await;

        assert_eq!(get_money(&row, "total"), Ok(dec!(0.3)));
    }

    #[tokio::test]
    async fn test_get_money_column_not_found() {
        let pool = setup_test_db().await;

        let row = fetch(&pool, "SELECT 1 AS id").await;
        let result = get_money(&row, "amount");

        assert!(matches!(result, Err(AggregatorError::Database(msg)) if msg.starts_with("Column 'amount' not found:")));
    }

    #[tokio::test]
    async fn test_get_money_unexpected_type() {
        let pool = setup_test_db().await;

        let row = fetch(&pool, "SELECT 'R$ 10,00' AS label").await;

        assert_eq!(
            get_money(&row, "label"),
            Err(AggregatorError::Database(
                "Unexpected type 'TEXT' for column 'label'".to_string()
            ))
        );
    }

    // money_to_f64 tests

    #[test]
    fn test_money_to_f64_rounds_to_cents() {
        assert_eq!(money_to_f64(dec!(773.3333333)), 773.33);
    }

    #[test]
    fn test_money_to_f64_negative() {
        assert_eq!(money_to_f64(dec!(-789.015)), -789.02);
    }

    #[test]
    fn test_money_to_f64_zero() {
        assert_eq!(money_to_f64(Decimal::ZERO), 0.0);
    }
}
