mod bracket_warning;
mod contribution_config;
mod date_range;
mod income_record;
mod monthly_breakdown;
mod tax_bracket;
mod tax_calculation;
mod tax_projection;

pub use bracket_warning::{BracketWarning, WarningLevel};
pub use contribution_config::{ContributionConfig, ContributionConfigError};
pub use date_range::DateRange;
pub use income_record::{IncomeRecord, NewIncomeRecord};
pub use monthly_breakdown::MonthlyTaxBreakdown;
pub use tax_bracket::{BRACKET_COUNT, BracketTable, TaxBracket};
pub use tax_calculation::TaxCalculation;
pub use tax_projection::{BracketInfo, TaxProjection};
