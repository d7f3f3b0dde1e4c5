//! Progressive-tax core for the Simples Nacional regime.
//!
//! Six cumulative revenue brackets, an effective-rate formula with deduction
//! terms, straight-line full-year projection and a graduated warning when an
//! entity nears the next bracket. Income aggregates come from a
//! [`TaxAggregator`] supplied by the caller.

pub mod calculations;
pub mod db;
pub mod format;
pub mod models;

pub use db::aggregator::{AggregatorError, IncomeStore, TaxAggregator, TaxLedger};
pub use models::*;
