#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Method, Request, StatusCode,
    },
    response::Response,
    Router,
};
use serde_json::Value;
use stock_ledger::{app_router, config::AppConfig, db, AppState};
use tower::ServiceExt;

/// Helper harness for spinning up the router on a fresh in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // One pooled connection keeps every query on the same memory database
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.get_with_cookie(uri, None).await
    }

    pub async fn get_with_cookie(&self, uri: &str, cookie: Option<&str>) -> Response {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        self.request(builder.body(Body::empty()).expect("failed to build request"))
            .await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body = serde_urlencoded::to_string(fields).expect("failed to encode form");
        self.post_raw_form(uri, &body).await
    }

    /// POST an already encoded form body as-is.
    pub async fn post_raw_form(&self, uri: &str, body: &str) -> Response {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");
        self.request(request).await
    }

    /// POST a form, assert the redirect-after-post, and follow it with the
    /// flash cookie the way a browser would.
    pub async fn submit_and_follow(&self, uri: &str, fields: &[(&str, &str)]) -> Value {
        let response = self.post_form(uri, fields).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "form rejected");
        let location = header(&response, LOCATION);
        assert_eq!(location, uri);
        let cookie = flash_cookie(&response).expect("flash cookie set");

        let page = self.get_with_cookie(&location, Some(&cookie)).await;
        assert_eq!(page.status(), StatusCode::OK);
        response_json(page).await
    }

    pub async fn get_json(&self, uri: &str) -> Value {
        let response = self.get(uri).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {uri}");
        response_json(response).await
    }

    pub async fn seed_category(&self, name: &str) -> i64 {
        self.submit_and_follow("/categories", &[("name", name)]).await;
        let page = self.get_json("/categories").await;
        page["data"]["categories"]
            .as_array()
            .and_then(|rows| rows.iter().find(|row| row["name"] == name))
            .and_then(|row| row["id"].as_i64())
            .expect("seeded category listed")
    }

    pub async fn seed_item(&self, name: &str, category_id: i64) -> i64 {
        let category_id = category_id.to_string();
        self.submit_and_follow("/items", &[("name", name), ("category_id", &category_id)])
            .await;
        let page = self.get_json("/items").await;
        page["data"]["items"]
            .as_array()
            .and_then(|rows| rows.iter().find(|row| row["name"] == name))
            .and_then(|row| row["id"].as_i64())
            .expect("seeded item listed")
    }

    pub async fn record(&self, uri: &str, item_id: i64, quantity: &str) {
        let item_id = item_id.to_string();
        self.submit_and_follow(
            uri,
            &[
                ("item_id", &item_id),
                ("date", "2024-06-01"),
                ("quantity", quantity),
            ],
        )
        .await;
    }
}

pub async fn response_json(response: Response) -> Value {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body bytes");
    serde_json::from_slice(&bytes).expect("json response")
}

pub fn header(response: &Response, name: axum::http::HeaderName) -> String {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_default()
}

/// `flash=<value>` pair from the response's Set-Cookie, if any.
pub fn flash_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter(|v| v.starts_with("flash="))
        .find_map(|v| v.split(';').next().map(str::to_string))
}
