use std::fmt;
use std::net::IpAddr;

use serde::Serialize;

pub const ANONYMOUS_KEY: &str = "anonymous";

/// Bucket identifier handed to the external rate limiter. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RateLimitKey(String);

impl RateLimitKey {
    pub fn anonymous() -> Self {
        Self(ANONYMOUS_KEY.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RateLimitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Picks the bucket for a request.
pub trait KeyResolver: Send + Sync {
    fn resolve(&self, principal: Option<&str>, remote: Option<IpAddr>) -> RateLimitKey;
}

/// Authenticated principal first, then the peer IP, then `"anonymous"`.
///
/// An unspecified address (`0.0.0.0`, `::`) counts as unresolvable.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalOrIpKeyResolver;

impl KeyResolver for PrincipalOrIpKeyResolver {
    fn resolve(&self, principal: Option<&str>, remote: Option<IpAddr>) -> RateLimitKey {
        if let Some(name) = principal.map(str::trim).filter(|n| !n.is_empty()) {
            return RateLimitKey(name.to_string());
        }

        match remote.filter(|ip| !ip.is_unspecified()) {
            Some(ip) => RateLimitKey(ip.to_string()),
            None => RateLimitKey::anonymous(),
        }
    }
}
