use crate::{
    commands::{stock::RecordMovementCommand, Command},
    db::DbPool,
    entities::{item, stock_ledger, MovementType},
    errors::ServiceError,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};

/// Ledger entry joined with the item it moves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    #[serde(flatten)]
    pub entry: stock_ledger::Model,
    pub item: Option<String>,
}

/// Service for the append-only stock ledger
#[derive(Clone)]
pub struct StockLedgerService {
    db_pool: Arc<DbPool>,
}

impl StockLedgerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Entries of one movement type, in insertion order
    #[instrument(skip(self))]
    pub async fn list_entries(
        &self,
        movement_type: MovementType,
    ) -> Result<Vec<LedgerRow>, ServiceError> {
        let rows = stock_ledger::Entity::find()
            .filter(stock_ledger::Column::MovementType.eq(movement_type))
            .order_by_asc(stock_ledger::Column::Id)
            .find_also_related(item::Entity)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!(
                    "Failed to list {} entries: {}",
                    movement_type.as_str(),
                    e
                );
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(entry, item)| LedgerRow {
                entry,
                item: item.map(|i| i.name),
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn record_movement(
        &self,
        command: RecordMovementCommand,
    ) -> Result<stock_ledger::Model, ServiceError> {
        command.execute(self.db_pool.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{categories::CreateCategoryCommand, items::CreateItemCommand};
    use crate::db::memory_pool;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn lists_only_the_requested_movement_type() {
        let pool = Arc::new(memory_pool().await);
        let category = CreateCategoryCommand {
            name: "Paint".into(),
        }
        .execute(pool.clone())
        .await
        .unwrap();
        let item = CreateItemCommand {
            name: "Primer".into(),
            size: None,
            description: None,
            category_id: category.id,
            unit: None,
            min_level: None,
            rack_no: None,
        }
        .execute(pool.clone())
        .await
        .unwrap();

        let service = StockLedgerService::new(pool);
        for (movement_type, quantity) in [
            (MovementType::Inward, 5.0),
            (MovementType::Outward, 2.0),
            (MovementType::Inward, 1.0),
        ] {
            service
                .record_movement(RecordMovementCommand {
                    item_id: item.id,
                    date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
                    movement_type,
                    quantity,
                    remarks: None,
                })
                .await
                .unwrap();
        }

        let inward = service.list_entries(MovementType::Inward).await.unwrap();
        assert_eq!(inward.len(), 2);
        assert!(inward
            .iter()
            .all(|row| row.entry.movement_type == MovementType::Inward));
        assert_eq!(inward[0].item.as_deref(), Some("Primer"));

        let outward = service.list_entries(MovementType::Outward).await.unwrap();
        assert_eq!(outward.len(), 1);
        assert_eq!(outward[0].entry.quantity, 2.0);
    }
}
