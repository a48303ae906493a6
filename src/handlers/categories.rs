use super::{
    flash::{redirect_with_notice, Flash, Notice},
    decoded_form, invalid_form_response, page_response, AppState,
};
use crate::{entities::category, errors::ServiceError, forms::CategoryForm};
use axum::{
    extract::{rejection::FormRejection, State},
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const CATEGORIES_PATH: &str = "/categories";

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoriesPage {
    pub categories: Vec<category::Model>,
}

async fn load_page(state: &AppState) -> Result<CategoriesPage, ServiceError> {
    Ok(CategoriesPage {
        categories: state.services.categories.list_categories().await?,
    })
}

/// Category master listing
pub async fn show_categories(
    State(state): State<AppState>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    Ok(page_response(load_page(&state).await?, flash))
}

/// Category intake
pub async fn add_category(
    State(state): State<AppState>,
    payload: Result<Form<CategoryForm>, FormRejection>,
) -> Result<Response, ServiceError> {
    let existing = state.services.categories.existing_names().await?;

    match decoded_form(payload).and_then(|form| form.into_command(&existing)) {
        Ok(command) => {
            let category = state.services.categories.create_category(command).await?;
            info!(category_id = category.id, "Category added");
            Ok(redirect_with_notice(CATEGORIES_PATH, Notice::CategoryAdded))
        }
        Err(errors) => {
            warn!("Category form rejected: {}", errors);
            Ok(invalid_form_response(load_page(&state).await?, &errors))
        }
    }
}
