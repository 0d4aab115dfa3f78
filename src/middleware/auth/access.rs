//! access token (JWT) 検証 → SecurityContext を extensions に入れる → アクセスルール適用
//!
//! - `Authorization: Bearer <jwt>` (scheme は大文字小文字を区別しない) があれば必ず検証する (public path でも不正な token は 401)
//! - Bearer 以外の scheme (Basic など) は無視し、匿名リクエストとして扱う
//! - 検証済み claims から AuthorityResolver で authorities / principal を解決する
//! - AccessPolicy の判定: Unauthenticated → 401, Denied → 403

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::security::{AccessDecision, SecurityContext};
use crate::state::AppState;

/// Apply authentication + access rules to every route of the given Router.
///
/// Must be applied after the routes (and fallback) are registered.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = match bearer_token(req.headers())? {
        Some(token) => Some(authenticate(&state, token)?),
        None => None,
    };

    let decision = state
        .access
        .evaluate(req.method(), req.uri().path(), ctx.as_ref());

    match decision {
        AccessDecision::Granted => {}
        AccessDecision::Unauthenticated => {
            tracing::debug!(path = %req.uri().path(), "authentication required");
            return Err(AppError::Unauthorized);
        }
        AccessDecision::Denied => {
            tracing::warn!(
                path = %req.uri().path(),
                principal = ctx.as_ref().map(|c| c.principal_name.as_str()),
                "access denied"
            );
            return Err(AppError::Forbidden);
        }
    }

    // middleware → extractor / 後続 middleware への受け渡し
    if let Some(ctx) = ctx {
        req.extensions_mut().insert(ctx);
    }

    Ok(next.run(req).await)
}

/// `Ok(None)` when there is no Authorization header or its scheme is not `Bearer`.
/// A bearer header without a token is rejected.
fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let Ok(value) = value.to_str() else {
        return Ok(None);
    };

    let value = value.trim_start();
    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Ok(None);
    }

    let token = token.trim();
    if token.is_empty() {
        tracing::debug!("bearer scheme without a token");
        return Err(AppError::Unauthorized);
    }

    Ok(Some(token))
}


fn authenticate(state: &AppState, token: &str) -> Result<SecurityContext, AppError> {
    let decoded = match state.verifier.verify(token) {
        Ok(decoded) => decoded,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(err.into());
        }
    };

    let resolution = state.authorities.resolve_token(&decoded);
    tracing::debug!(
        principal = %resolution.principal_name,
        authorities = resolution.authorities.len(),
        "access token accepted"
    );

    Ok(SecurityContext::new(resolution, decoded.subject))
}
