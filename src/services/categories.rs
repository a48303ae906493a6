use crate::{
    commands::{categories::CreateCategoryCommand, Command},
    db::DbPool,
    entities::category,
    errors::ServiceError,
    forms::Choice,
};
use sea_orm::{EntityTrait, QueryOrder};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, instrument};

/// Service for the category master
#[derive(Clone)]
pub struct CategoryService {
    db_pool: Arc<DbPool>,
}

impl CategoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// All categories in insertion order
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<category::Model>, ServiceError> {
        category::Entity::find()
            .order_by_asc(category::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to list categories: {}", e);
                ServiceError::DatabaseError(e)
            })
    }

    /// Choice list for the item form's category field
    pub async fn category_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        Ok(self
            .list_categories()
            .await?
            .into_iter()
            .map(|c| Choice {
                id: c.id,
                label: c.name,
            })
            .collect())
    }

    /// Names already taken, used to reject duplicates as a field error
    pub async fn existing_names(&self) -> Result<HashSet<String>, ServiceError> {
        Ok(self
            .list_categories()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create_category(
        &self,
        command: CreateCategoryCommand,
    ) -> Result<category::Model, ServiceError> {
        command.execute(self.db_pool.clone()).await
    }
}
