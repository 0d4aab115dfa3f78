/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 依存生成 → Router 組み立て
 * - Middleware の適用 (HTTP / CORS / security headers / 認証 / rate limit key)
 * - axum::serve() で起動 (ConnectInfo 付き)
 */
use std::net::SocketAddr;
use std::{panic, process, sync::Arc};

use anyhow::Result;
use axum::Router;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::error::AppError;
use crate::security::{AccessPolicy, AuthorityResolver};
use crate::services::rate_limit::PrincipalOrIpKeyResolver;
use crate::services::token::TokenVerifier;
use crate::state::AppState;
use crate::{api, middleware};

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,api_gateway=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        // Always surface panics via tracing so they don't get "lost"
        tracing::error!(?info, "panic");

        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env()?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting gateway in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}

pub fn build_state(config: &Config) -> Result<AppState, AppError> {
    let verifier = TokenVerifier::new(&config.jwt).map_err(|err| {
        tracing::error!(error = %err, "failed to build access token verifier");
        AppError::from(err)
    })?;

    Ok(AppState::new(
        Arc::new(verifier),
        Arc::new(AuthorityResolver::default()),
        Arc::new(AccessPolicy::gateway_default()),
        Arc::new(PrincipalOrIpKeyResolver),
    ))
}

/// Routes first, then layers from the inside out:
/// rate limit key → auth → security headers → CORS → HTTP (request id, trace, timeout).
pub fn build_router(state: AppState, config: &Config) -> Router {
    async fn not_found() -> AppError {
        AppError::NotFound
    }

    let router = Router::new()
        .merge(api::actuator::routes())
        .merge(api::fallback::routes())
        .nest("/api/v1", api::v1::routes())
        .fallback(not_found);

    let router = middleware::rate_limit_key::apply(router, state.clone());
    let router = middleware::auth::access::apply(router, state.clone());
    let router = router.with_state(state);

    let router = middleware::security_headers::apply(router);
    let router = middleware::cors::apply(router, config);
    middleware::http::apply(router, config)
}
