//! SQLite-backed income ledger implementing the aggregator contract of
//! `simples-core`.

mod decimal;
mod factory;
mod ledger;

pub use factory::SqliteLedgerFactory;
pub use ledger::SqliteLedger;
