use crate::{commands::Command, db::DbPool, entities::item, errors::ServiceError};
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

/// New item master row. Optional text fields are stored exactly as given.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateItemCommand {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Field must be between 1 and 100 characters long."
    ))]
    pub name: String,
    #[validate(length(max = 50, message = "Field cannot be longer than 50 characters."))]
    pub size: Option<String>,
    #[validate(length(max = 200, message = "Field cannot be longer than 200 characters."))]
    pub description: Option<String>,
    pub category_id: i32,
    #[validate(length(max = 20, message = "Field cannot be longer than 20 characters."))]
    pub unit: Option<String>,
    pub min_level: Option<f64>,
    #[validate(length(max = 20, message = "Field cannot be longer than 20 characters."))]
    pub rack_no: Option<String>,
}

#[async_trait::async_trait]
impl Command for CreateItemCommand {
    type Result = item::Model;

    #[instrument(skip(self, db_pool), fields(name = %self.name, category_id = self.category_id))]
    async fn execute(&self, db_pool: Arc<DbPool>) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            warn!("Invalid item: {}", e);
            ServiceError::from(e)
        })?;

        let db = db_pool.as_ref();

        let item = item::ActiveModel {
            name: Set(self.name.clone()),
            size: Set(self.size.clone()),
            description: Set(self.description.clone()),
            category_id: Set(self.category_id),
            unit: Set(self.unit.clone()),
            min_level: Set(self.min_level),
            rack_no: Set(self.rack_no.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to create item '{}': {}", self.name, e);
            ServiceError::DatabaseError(e)
        })?;

        info!(item_id = item.id, "Item created");
        Ok(item)
    }
}
