#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use salesbuddy::{app::build_app, config::AppConfig, state::AppState};

pub const SECRET: &str = "test-secret-do-not-use-in-production";

/// Config with a cheap argon2 work factor so tests stay fast.
pub fn test_config(database_url: &str) -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("DATABASE_URL", database_url),
        ("JWT_SECRET", SECRET),
        ("ARGON2_MEMORY_KIB", "1024"),
        ("ARGON2_ITERATIONS", "1"),
    ]);
    AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap()
}

pub fn state_with(db: PgPool) -> AppState {
    AppState::from_parts(db, test_config("postgres://unused")).unwrap()
}

pub fn app_with(db: PgPool) -> Router {
    build_app(state_with(db))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(t) = token {
        req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => req.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
