use crate::{
    commands::Command,
    db::DbPool,
    entities::{stock_ledger, MovementType},
    errors::ServiceError,
};
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

/// Appends one inward or outward entry to the stock ledger.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecordMovementCommand {
    pub item_id: i32,
    pub date: NaiveDate,
    pub movement_type: MovementType,
    pub quantity: f64,
    #[validate(length(max = 200, message = "Field cannot be longer than 200 characters."))]
    pub remarks: Option<String>,
}

impl RecordMovementCommand {
    fn check_movement(&self) -> Result<(), ServiceError> {
        if !matches!(
            self.movement_type,
            MovementType::Inward | MovementType::Outward
        ) {
            return Err(ServiceError::ValidationError(format!(
                "movement type {} cannot be recorded",
                self.movement_type.as_str()
            )));
        }
        if !self.quantity.is_finite() || self.quantity == 0.0 {
            return Err(ServiceError::ValidationError(
                "quantity must be a non-zero number".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl Command for RecordMovementCommand {
    type Result = stock_ledger::Model;

    #[instrument(
        skip(self, db_pool),
        fields(item_id = self.item_id, movement_type = self.movement_type.as_str())
    )]
    async fn execute(&self, db_pool: Arc<DbPool>) -> Result<Self::Result, ServiceError> {
        self.validate()
            .map_err(ServiceError::from)
            .and_then(|_| self.check_movement())
            .map_err(|e| {
                warn!("Invalid ledger entry: {}", e);
                e
            })?;

        let db = db_pool.as_ref();

        let entry = stock_ledger::ActiveModel {
            item_id: Set(self.item_id),
            date: Set(self.date),
            movement_type: Set(self.movement_type),
            quantity: Set(self.quantity),
            remarks: Set(self.remarks.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!(
                "Failed to record {} entry for item {}: {}",
                self.movement_type.as_str(),
                self.item_id,
                e
            );
            ServiceError::DatabaseError(e)
        })?;

        info!(entry_id = entry.id, quantity = entry.quantity, "Ledger entry recorded");
        Ok(entry)
    }
}
