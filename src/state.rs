/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - token 検証, 権限解決, アクセスルール, rate limit key の解決
 * - Clone 前提で持つ (内部は Arc)
 */
use std::sync::Arc;

use crate::security::{AccessPolicy, AuthorityResolver};
use crate::services::rate_limit::KeyResolver;
use crate::services::token::TokenVerifier;

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub authorities: Arc<AuthorityResolver>,
    pub access: Arc<AccessPolicy>,
    pub key_resolver: Arc<dyn KeyResolver>,
}

impl AppState {
    pub fn new(
        verifier: Arc<TokenVerifier>,
        authorities: Arc<AuthorityResolver>,
        access: Arc<AccessPolicy>,
        key_resolver: Arc<dyn KeyResolver>,
    ) -> Self {
        Self {
            verifier,
            authorities,
            access,
            key_resolver,
        }
    }
}
