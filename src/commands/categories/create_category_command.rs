use crate::{commands::Command, db::DbPool, entities::category, errors::ServiceError};
use sea_orm::{ActiveModelTrait, Set};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryCommand {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Field must be between 1 and 100 characters long."
    ))]
    pub name: String,
}

#[async_trait::async_trait]
impl Command for CreateCategoryCommand {
    type Result = category::Model;

    #[instrument(skip(self, db_pool), fields(name = %self.name))]
    async fn execute(&self, db_pool: Arc<DbPool>) -> Result<Self::Result, ServiceError> {
        self.validate().map_err(|e| {
            warn!("Invalid category: {}", e);
            ServiceError::from(e)
        })?;

        let db = db_pool.as_ref();

        let category = category::ActiveModel {
            name: Set(self.name.clone()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map_err(|e| {
            error!("Failed to create category '{}': {}", self.name, e);
            ServiceError::DatabaseError(e)
        })?;

        info!(category_id = category.id, "Category created");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_pool;
    use assert_matches::assert_matches;

    #[tokio::test]
    async fn inserts_category() {
        let pool = Arc::new(memory_pool().await);
        let command = CreateCategoryCommand {
            name: "Fasteners".into(),
        };

        let created = command.execute(pool).await.unwrap();
        assert_eq!(created.name, "Fasteners");
        assert!(created.id > 0);
    }

    #[tokio::test]
    async fn rejects_empty_name_without_writing() {
        let pool = Arc::new(memory_pool().await);
        let command = CreateCategoryCommand {
            name: String::new(),
        };

        assert_matches!(
            command.execute(pool).await,
            Err(ServiceError::ValidationError(_))
        );
    }

    #[tokio::test]
    async fn duplicate_name_hits_unique_constraint() {
        let pool = Arc::new(memory_pool().await);
        let command = CreateCategoryCommand {
            name: "Paint".into(),
        };

        command.execute(pool.clone()).await.unwrap();
        assert_matches!(
            command.execute(pool).await,
            Err(ServiceError::DatabaseError(_))
        );
    }
}
