//! Read and write services used by the HTTP handlers.

pub mod balances;
pub mod categories;
pub mod items;
pub mod stock_ledger;
