use serde::Serialize;

use crate::security::AuthoritySet;
use crate::services::rate_limit::RateLimitKey;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub principal: String,
    pub authorities: AuthoritySet,
    pub rate_limit_key: RateLimitKey,
}
