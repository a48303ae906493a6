//! Stock inward and outward pages. Both share one form and differ only in the
//! movement type they stamp on new entries.

use super::{
    flash::{redirect_with_notice, Flash, Notice},
    decoded_form, invalid_form_response, page_response, AppState,
};
use crate::{
    entities::MovementType,
    errors::ServiceError,
    forms::{Choice, ReferenceSet, StockMovementForm},
    services::stock_ledger::LedgerRow,
};
use axum::{
    extract::{rejection::FormRejection, State},
    response::Response,
    Form,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const STOCK_INWARD_PATH: &str = "/stock-inward";
pub const STOCK_OUTWARD_PATH: &str = "/stock-outward";

#[derive(Debug, Serialize, Deserialize)]
pub struct StockPage {
    pub movement_type: MovementType,
    pub entries: Vec<LedgerRow>,
    /// Choices for the form's `item_id` field
    pub items: Vec<Choice>,
}

fn path_and_notice(movement_type: MovementType) -> (&'static str, Notice) {
    match movement_type {
        MovementType::Outward => (STOCK_OUTWARD_PATH, Notice::StockOutwardAdded),
        _ => (STOCK_INWARD_PATH, Notice::StockInwardAdded),
    }
}

async fn load_page(
    state: &AppState,
    movement_type: MovementType,
    items: Vec<Choice>,
) -> Result<StockPage, ServiceError> {
    Ok(StockPage {
        movement_type,
        entries: state.services.stock_ledger.list_entries(movement_type).await?,
        items,
    })
}

async fn show_stock(
    state: AppState,
    movement_type: MovementType,
    flash: Flash,
) -> Result<Response, ServiceError> {
    let items = state.services.items.item_choices().await?;
    Ok(page_response(
        load_page(&state, movement_type, items).await?,
        flash,
    ))
}

async fn add_stock(
    state: AppState,
    movement_type: MovementType,
    payload: Result<Form<StockMovementForm>, FormRejection>,
) -> Result<Response, ServiceError> {
    let items = state.services.items.item_choices().await?;
    let references = ReferenceSet::from_choices(&items);

    let command = decoded_form(payload)
        .and_then(|form| form.into_command(movement_type, &references));

    match command {
        Ok(command) => {
            let entry = state.services.stock_ledger.record_movement(command).await?;
            info!(
                entry_id = entry.id,
                item_id = entry.item_id,
                "Stock {} entry added",
                movement_type.as_str()
            );
            let (path, notice) = path_and_notice(movement_type);
            Ok(redirect_with_notice(path, notice))
        }
        Err(errors) => {
            warn!("Stock {} form rejected: {}", movement_type.as_str(), errors);
            Ok(invalid_form_response(
                load_page(&state, movement_type, items).await?,
                &errors,
            ))
        }
    }
}

pub async fn show_stock_inward(
    State(state): State<AppState>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    show_stock(state, MovementType::Inward, flash).await
}

pub async fn add_stock_inward(
    State(state): State<AppState>,
    payload: Result<Form<StockMovementForm>, FormRejection>,
) -> Result<Response, ServiceError> {
    add_stock(state, MovementType::Inward, payload).await
}

pub async fn show_stock_outward(
    State(state): State<AppState>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    show_stock(state, MovementType::Outward, flash).await
}

pub async fn add_stock_outward(
    State(state): State<AppState>,
    payload: Result<Form<StockMovementForm>, FormRejection>,
) -> Result<Response, ServiceError> {
    add_stock(state, MovementType::Outward, payload).await
}
