use super::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const HEALTH_PATH: &str = "/health";

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`
    pub status: String,
    pub version: String,
    pub environment: String,
    pub timestamp: String,
    pub database: ComponentHealth,
}

/// Pings the ledger store; 503 when it does not answer.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let start = Instant::now();
    let db_result = crate::db::check_connection(&state.db).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    let (status_code, status, database) = match db_result {
        Ok(()) => (
            StatusCode::OK,
            "healthy",
            ComponentHealth {
                status: ComponentStatus::Up,
                latency_ms,
                error: None,
            },
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            ComponentHealth {
                status: ComponentStatus::Down,
                latency_ms,
                error: Some(e.response_message()),
            },
        ),
    };

    (
        status_code,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.config.environment.clone(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            database,
        }),
    )
}
