use crate::{
    commands::{items::CreateItemCommand, Command},
    db::DbPool,
    entities::{category, item},
    errors::ServiceError,
    forms::Choice,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, instrument};

/// Item master row joined with its category name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemRow {
    #[serde(flatten)]
    pub item: item::Model,
    pub category: Option<String>,
}

/// Service for the item master
#[derive(Clone)]
pub struct ItemService {
    db_pool: Arc<DbPool>,
}

impl ItemService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Items with their category, in insertion order; optionally only those
    /// filed under `category_id`
    #[instrument(skip(self))]
    pub async fn list_items(&self, category_id: Option<i32>) -> Result<Vec<ItemRow>, ServiceError> {
        let mut query = item::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(item::Column::CategoryId.eq(category_id));
        }

        let rows = query
            .order_by_asc(item::Column::Id)
            .find_also_related(category::Entity)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to list items: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(rows
            .into_iter()
            .map(|(item, category)| ItemRow {
                item,
                category: category.map(|c| c.name),
            })
            .collect())
    }

    /// Choice list for the stock pages' item field
    #[instrument(skip(self))]
    pub async fn item_choices(&self) -> Result<Vec<Choice>, ServiceError> {
        let items = item::Entity::find()
            .order_by_asc(item::Column::Id)
            .all(&*self.db_pool)
            .await
            .map_err(|e| {
                error!("Failed to load item choices: {}", e);
                ServiceError::DatabaseError(e)
            })?;

        Ok(items
            .into_iter()
            .map(|i| Choice {
                id: i.id,
                label: i.name,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn create_item(&self, command: CreateItemCommand) -> Result<item::Model, ServiceError> {
        command.execute(self.db_pool.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::categories::CreateCategoryCommand;
    use crate::db::memory_pool;

    #[tokio::test]
    async fn items_carry_their_category_name() {
        let pool = Arc::new(memory_pool().await);
        let category = CreateCategoryCommand {
            name: "Electrical".into(),
        }
        .execute(pool.clone())
        .await
        .unwrap();

        let service = ItemService::new(pool);
        service
            .create_item(CreateItemCommand {
                name: "Cable tie".into(),
                size: Some("200mm".into()),
                description: None,
                category_id: category.id,
                unit: None,
                min_level: None,
                rack_no: None,
            })
            .await
            .unwrap();

        let rows = service.list_items(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.name, "Cable tie");
        assert_eq!(rows[0].category.as_deref(), Some("Electrical"));

        let choices = service.item_choices().await.unwrap();
        assert_eq!(
            choices,
            vec![Choice {
                id: rows[0].item.id,
                label: "Cable tie".into()
            }]
        );
    }

    #[tokio::test]
    async fn listing_can_be_narrowed_to_one_category() {
        let pool = Arc::new(memory_pool().await);
        let service = ItemService::new(pool.clone());

        let mut category_ids = Vec::new();
        for name in ["Electrical", "Plumbing"] {
            let category = CreateCategoryCommand { name: name.into() }
                .execute(pool.clone())
                .await
                .unwrap();
            category_ids.push(category.id);
        }
        let (electrical, plumbing) = (category_ids[0], category_ids[1]);

        for (name, category_id) in [("Fuse", electrical), ("Elbow", plumbing), ("Relay", electrical)] {
            service
                .create_item(CreateItemCommand {
                    name: name.into(),
                    size: None,
                    description: None,
                    category_id,
                    unit: None,
                    min_level: None,
                    rack_no: None,
                })
                .await
                .unwrap();
        }

        let names: Vec<_> = service
            .list_items(Some(electrical))
            .await
            .unwrap()
            .into_iter()
            .map(|row| row.item.name)
            .collect();
        assert_eq!(names, vec!["Fuse".to_string(), "Relay".to_string()]);

        assert_eq!(service.list_items(None).await.unwrap().len(), 3);
        assert!(service.list_items(Some(999)).await.unwrap().is_empty());
    }
}
