//! Fallback responder for unavailable upstreams.
//!
//! The route's circuit breaker forwards to `/fallback/{routeId}`; any method is
//! accepted. Fixed field set: `timestamp`, `status`, `error`, `message`, `path`,
//! `routeId`.

use axum::{
    Json, Router,
    extract::{OriginalUri, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::any,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

pub const FALLBACK_ERROR: &str = "Service Unavailable";
pub const FALLBACK_MESSAGE: &str = "Upstream service is temporarily unavailable.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackBody {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: &'static str,
    pub message: &'static str,
    pub path: String,
    pub route_id: String,
}

impl FallbackBody {
    pub fn new(route_id: String, path: String) -> Self {
        Self {
            timestamp: Utc::now(),
            status: StatusCode::SERVICE_UNAVAILABLE.as_u16(),
            error: FALLBACK_ERROR,
            message: FALLBACK_MESSAGE,
            path,
            route_id,
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/fallback/{route_id}", any(fallback))
}

pub async fn fallback(
    Path(route_id): Path<String>,
    OriginalUri(uri): OriginalUri,
) -> impl IntoResponse {
    tracing::warn!(route_id = %route_id, path = %uri.path(), "upstream unavailable, serving fallback");

    let body = FallbackBody::new(route_id, uri.path().to_string());
    (StatusCode::SERVICE_UNAVAILABLE, Json(body))
}
