//! Stock Ledger Library
//!
//! Categories, items and an append-only stock ledger, with closing balances
//! derived on every read for the dashboard and the report.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod commands;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod services;
pub mod tracing;

use axum::{routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use handlers::{
    categories::{self, CATEGORIES_PATH},
    dashboard::{self, DASHBOARD_PATH, REPORT_PATH},
    health::{self, HEALTH_PATH},
    items::{self, ITEMS_PATH},
    stock::{self, STOCK_INWARD_PATH, STOCK_OUTWARD_PATH},
};

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// Wires the services around one shared store handle.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }
}

// Common response wrappers
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Every page route plus `/health`, wrapped in request-id and HTTP tracing layers.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route(DASHBOARD_PATH, get(dashboard::show_dashboard))
        .route(
            CATEGORIES_PATH,
            get(categories::show_categories).post(categories::add_category),
        )
        .route(ITEMS_PATH, get(items::show_items).post(items::add_item))
        .route(
            STOCK_INWARD_PATH,
            get(stock::show_stock_inward).post(stock::add_stock_inward),
        )
        .route(
            STOCK_OUTWARD_PATH,
            get(stock::show_stock_outward).post(stock::add_stock_outward),
        )
        .route(REPORT_PATH, get(dashboard::show_report))
        .route(HEALTH_PATH, get(health::health_check))
        .fallback(handlers::not_found)
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
