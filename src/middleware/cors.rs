//! CORS policy for browser clients.
//!
//! Note:
//! - CORS is enforced by browsers. Native mobile apps and server-to-server calls are not
//!   restricted by CORS.
//! - Preflight (`OPTIONS`) requests are answered here, before authentication runs.
//!
//! Policy:
//! - Allowed origins are patterns from Config (`CORS_ALLOWED_ORIGIN_PATTERNS`):
//!   `http://localhost:*` (any port), `https://shop.example.com` (exact), `*` (any).
//! - Credentials are allowed, so request headers are mirrored instead of using a wildcard.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use url::Url;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortPattern {
    Any,
    Exact(Option<u16>),
}

/// One allowed-origin pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    Any,
    Origin {
        scheme: String,
        host: String,
        port: PortPattern,
    },
}

impl OriginPattern {
    /// Returns `None` for patterns that are not a valid origin.
    pub fn parse(pattern: &str) -> Option<Self> {
        let pattern = pattern.trim();
        if pattern == "*" {
            return Some(Self::Any);
        }

        let (base, any_port) = match pattern.strip_suffix(":*") {
            Some(base) => (base, true),
            None => (pattern, false),
        };

        let url = Url::parse(base).ok()?;
        let host = url.host_str()?.to_ascii_lowercase();
        let port = if any_port {
            PortPattern::Any
        } else {
            PortPattern::Exact(url.port_or_known_default())
        };

        Some(Self::Origin {
            scheme: url.scheme().to_string(),
            host,
            port,
        })
    }

    pub fn matches(&self, origin: &str) -> bool {
        let Self::Origin { scheme, host, port } = self else {
            return true;
        };

        let Ok(url) = Url::parse(origin) else {
            return false;
        };

        url.scheme() == scheme
            && url
                .host_str()
                .is_some_and(|h| h.eq_ignore_ascii_case(host))
            && match port {
                // `:*` requires an explicit port, like `http://localhost:3000`
                PortPattern::Any => url.port().is_some(),
                PortPattern::Exact(expected) => url.port_or_known_default() == *expected,
            }
    }
}

/// Apply the CORS policy to the given Router.
pub fn apply(router: Router, config: &Config) -> Router {
    let patterns: Arc<Vec<OriginPattern>> = Arc::new(
        config
            .cors_allowed_origin_patterns
            .iter()
            .filter_map(|p| {
                let parsed = OriginPattern::parse(p);
                if parsed.is_none() {
                    tracing::warn!(pattern = %p, "ignoring invalid CORS origin pattern");
                }
                parsed
            })
            .collect(),
    );

    let allow_origin = AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
        origin
            .to_str()
            .is_ok_and(|o| patterns.iter().any(|p| p.matches(o)))
    });

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .max_age(Duration::from_secs(config.cors_max_age_seconds));

    router.layer(cors)
}
