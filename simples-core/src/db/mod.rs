pub mod aggregator;
pub mod factory;

pub use aggregator::{AggregatorError, IncomeStore, TaxAggregator, TaxLedger};
pub use factory::{DbConfig, LedgerFactory, LedgerRegistry};
