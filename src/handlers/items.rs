use super::{
    decoded_form,
    flash::{redirect_with_notice, Flash, Notice},
    invalid_form_response, page_response, AppState,
};
use crate::{
    errors::ServiceError,
    forms::{Choice, ItemForm, ReferenceSet},
    services::items::ItemRow,
};
use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Query, State,
    },
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const ITEMS_PATH: &str = "/items";

#[derive(Debug, Serialize, Deserialize)]
pub struct ItemsPage {
    pub items: Vec<ItemRow>,
    /// Choices for the form's `category_id` field
    pub categories: Vec<Choice>,
}

/// `?category_id=` narrows the listing; a blank value lists everything.
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub category_id: Option<String>,
}

impl ItemFilter {
    fn category_id(&self) -> Result<Option<i32>, ServiceError> {
        match self.category_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                ServiceError::ValidationError(format!(
                    "category_id must be an integer, got {:?}",
                    raw
                ))
            }),
        }
    }
}

async fn load_page(
    state: &AppState,
    categories: Vec<Choice>,
    category_id: Option<i32>,
) -> Result<ItemsPage, ServiceError> {
    Ok(ItemsPage {
        items: state.services.items.list_items(category_id).await?,
        categories,
    })
}

/// Item master listing
pub async fn show_items(
    State(state): State<AppState>,
    filter: Result<Query<ItemFilter>, QueryRejection>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    let Query(filter) =
        filter.map_err(|rejection| ServiceError::ValidationError(rejection.body_text()))?;
    let category_id = filter.category_id()?;

    let categories = state.services.categories.category_choices().await?;
    Ok(page_response(
        load_page(&state, categories, category_id).await?,
        flash,
    ))
}

/// Item intake
pub async fn add_item(
    State(state): State<AppState>,
    payload: Result<Form<ItemForm>, FormRejection>,
) -> Result<Response, ServiceError> {
    let categories = state.services.categories.category_choices().await?;
    let references = ReferenceSet::from_choices(&categories);

    match decoded_form(payload).and_then(|form| form.into_command(&references)) {
        Ok(command) => {
            let item = state.services.items.create_item(command).await?;
            info!(item_id = item.id, "Item added");
            Ok(redirect_with_notice(ITEMS_PATH, Notice::ItemAdded))
        }
        Err(errors) => {
            warn!("Item form rejected: {}", errors);
            Ok(invalid_form_response(
                load_page(&state, categories, None).await?,
                &errors,
            ))
        }
    }
}
