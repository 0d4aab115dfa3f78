use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::security::SecurityContext;
use crate::state::AppState;

/// Handler で SecurityContext を受け取るための extractor
/// middleware が request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（public path で token なし・ミドルウェア未設定）
pub struct SecurityCtx(pub SecurityContext);

impl FromRequestParts<AppState> for SecurityCtx {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SecurityContext>()
            .cloned()
            .map(SecurityCtx)
            .ok_or(AppError::Unauthorized)
    }
}
