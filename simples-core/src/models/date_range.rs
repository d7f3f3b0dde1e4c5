use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive calendar date range handed to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        Self { start, end }
    }

    /// January 1 through December 31 of `year`.
    ///
    /// Returns `None` for years chrono cannot represent.
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// First through last day of `month` in `year`.
    pub fn month(
        year: i32,
        month: u32,
    ) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    /// January 1 of `date`'s year through `date`.
    pub fn year_to_date(date: NaiveDate) -> Self {
        Self {
            start: date.with_ordinal(1).unwrap_or(date),
            end: date,
        }
    }

    /// The twelve months ending on `date`, inclusive.
    pub fn trailing_12_months(date: NaiveDate) -> Self {
        let start = date
            .checked_sub_months(Months::new(12))
            .and_then(|d| d.succ_opt())
            .unwrap_or(date);
        Self { start, end: date }
    }

    pub fn contains(
        &self,
        date: NaiveDate,
    ) -> bool {
        date >= self.start && date <= self.end
    }
}
