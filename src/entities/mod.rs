//! sea-orm entities backing the ledger store.

pub mod category;
pub mod item;
pub mod stock_ledger;

pub use stock_ledger::MovementType;
