/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 認証 / アクセスルールは middleware::auth で Router 全体に掛ける (ここでは layer を持たない)
 */
use axum::{Router, routing::get};

use crate::state::AppState;

use crate::api::v1::handlers::me::me;

pub fn routes() -> Router<AppState> {
    Router::new().route("/me", get(me))
}
