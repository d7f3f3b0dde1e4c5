use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fiscal figures for one calendar month of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTaxBreakdown {
    /// Calendar month, 1-12.
    pub month: u32,
    pub month_name: String,
    pub gross_income: Decimal,
    pub tax_paid: Decimal,
    pub net_income: Decimal,
    pub contribution_paid: Decimal,
}
