/*
 * Responsibility
 * - GET /actuator/health (疎通用, 認証なし)
 * - GET /actuator/info (package 名 / version)
 */
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/actuator/health", get(health))
        .route("/actuator/info", get(info))
}

pub async fn health() -> Json<Value> {
    Json(json!({"status": "UP"}))
}

pub async fn info() -> Json<Value> {
    Json(json!({
        "app": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}
