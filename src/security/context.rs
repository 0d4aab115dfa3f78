/*
 * Responsibility
 * - 認証済みリクエストに付与されるコンテキストの型
 * - middleware が request extensions に格納し、handler / 後続 middleware はこの型だけを見る
 */
use super::authorities::AuthorityResolution;
use super::authority_set::AuthoritySet;

/// Identity of an authenticated request.
///
/// - `principal_name` is never empty (`"unknown"` at worst)
/// - `subject` is the raw `sub` claim, kept for audit/correlation
#[derive(Debug, Clone)]
pub struct SecurityContext {
    pub principal_name: String,
    pub subject: Option<String>,
    pub authorities: AuthoritySet,
}

impl SecurityContext {
    pub fn new(resolution: AuthorityResolution, subject: Option<String>) -> Self {
        Self {
            principal_name: resolution.principal_name,
            subject,
            authorities: resolution.authorities,
        }
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}
