pub mod categories;
pub mod dashboard;
pub mod flash;
pub mod health;
pub mod items;
pub mod stock;

use crate::{
    db::DbPool,
    errors::ServiceError,
    forms::{field_messages, undecodable_body},
    services::{
        balances::BalanceService, categories::CategoryService, items::ItemService,
        stock_ledger::StockLedgerService,
    },
    ApiResponse,
};
use axum::{
    extract::rejection::FormRejection,
    http::{header::SET_COOKIE, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form, Json,
};
use flash::Flash;
use serde::Serialize;
use std::sync::Arc;
use validator::ValidationErrors;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub categories: Arc<CategoryService>,
    pub items: Arc<ItemService>,
    pub stock_ledger: Arc<StockLedgerService>,
    pub balances: Arc<BalanceService>,
}

impl AppServices {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            categories: Arc::new(CategoryService::new(db_pool.clone())),
            items: Arc::new(ItemService::new(db_pool.clone())),
            stock_ledger: Arc::new(StockLedgerService::new(db_pool.clone())),
            balances: Arc::new(BalanceService::new(db_pool)),
        }
    }
}

/// 200 page document; a pending flash notice becomes the message and the
/// cookie is cleared.
pub(crate) fn page_response<T: Serialize>(data: T, flash: Flash) -> Response {
    let mut body = ApiResponse::success(data);
    body.message = flash.notice().map(|notice| notice.message().to_string());

    let mut response = (StatusCode::OK, Json(body)).into_response();
    if flash.is_pending() {
        response
            .headers_mut()
            .append(SET_COOKIE, flash::clear_cookie());
    }
    response
}

/// 400 page document carrying the unchanged page and one line per field error.
pub(crate) fn invalid_form_response<T: Serialize>(data: T, errors: &ValidationErrors) -> Response {
    let mut body = ApiResponse::validation_errors(field_messages(errors));
    body.data = Some(data);

    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

/// Unwraps a form body. A body that cannot be decoded at all (wrong content
/// type, repeated field) becomes a form-level validation error so that it is
/// answered like any other rejected form.
pub(crate) fn decoded_form<T>(
    payload: Result<Form<T>, FormRejection>,
) -> Result<T, ValidationErrors> {
    payload
        .map(|Form(form)| form)
        .map_err(|rejection| undecodable_body(rejection.body_text()))
}

/// Unknown paths get the standard 404 error document.
pub async fn not_found(uri: Uri) -> ServiceError {
    ServiceError::NotFound(format!("no page at {}", uri.path()))
}
