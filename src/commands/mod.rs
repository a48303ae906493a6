use crate::{db::DbPool, errors::ServiceError};
use async_trait::async_trait;
use std::sync::Arc;

/// Command trait for implementing the Command Pattern
///
/// A command carries everything one write needs and re-validates its fields
/// before touching the store.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command against the ledger store
    ///
    /// # Arguments
    /// * `db_pool` - Database connection pool for persistence operations
    ///
    /// # Returns
    /// * `Result<Self::Result, ServiceError>` - The result of command execution or an error
    async fn execute(&self, db_pool: Arc<DbPool>) -> Result<Self::Result, ServiceError>;
}

pub mod categories;
pub mod items;
pub mod stock;
