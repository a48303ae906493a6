use super::{flash::Flash, page_response, AppState};
use crate::{errors::ServiceError, services::balances::ItemBalance};
use axum::{extract::State, response::Response};
use serde::{Deserialize, Serialize};

pub const DASHBOARD_PATH: &str = "/";
pub const REPORT_PATH: &str = "/report";

/// Shared document of the dashboard and the report
#[derive(Debug, Serialize, Deserialize)]
pub struct BalancesPage {
    pub items: Vec<ItemBalance>,
}

async fn load_page(state: &AppState) -> Result<BalancesPage, ServiceError> {
    Ok(BalancesPage {
        items: state.services.balances.list_item_balances().await?,
    })
}

/// Every item with its inward, outward and closing quantities
pub async fn show_dashboard(
    State(state): State<AppState>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    Ok(page_response(load_page(&state).await?, flash))
}

/// Closing stock report; same read and shape as the dashboard
pub async fn show_report(
    State(state): State<AppState>,
    flash: Flash,
) -> Result<Response, ServiceError> {
    Ok(page_response(load_page(&state).await?, flash))
}
