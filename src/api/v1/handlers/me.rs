/*
 * Responsibility
 * - GET /api/v1/me
 * - 認証済み caller の principal / authorities / rate limit key を返す (introspection)
 */
use axum::{Extension, Json};

use crate::api::v1::dto::me::MeResponse;
use crate::api::v1::extractors::SecurityCtx;
use crate::services::rate_limit::RateLimitKey;

pub async fn me(
    SecurityCtx(ctx): SecurityCtx,
    Extension(rate_limit_key): Extension<RateLimitKey>,
) -> Json<MeResponse> {
    Json(MeResponse {
        principal: ctx.principal_name,
        authorities: ctx.authorities,
        rate_limit_key,
    })
}
