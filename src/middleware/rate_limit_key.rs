//! Rate-limit key resolution.
//!
//! Runs after authentication: the principal (if any) and the peer address are
//! turned into a `RateLimitKey`, stored in request extensions for the limiter.
//!
//! The peer address comes from `ConnectInfo<SocketAddr>`, which only exists
//! when the server is started with `into_make_service_with_connect_info`.

use std::net::SocketAddr;

use axum::{
    Router,
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::security::SecurityContext;
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, rate_limit_key_middleware))
}

async fn rate_limit_key_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let principal = req
        .extensions()
        .get::<SecurityContext>()
        .map(|ctx| ctx.principal_name.as_str());
    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());

    let key = state.key_resolver.resolve(principal, remote);
    tracing::debug!(key = %key, "rate limit key resolved");

    req.extensions_mut().insert(key);
    next.run(req).await
}
