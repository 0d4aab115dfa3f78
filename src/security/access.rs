//! Path/method based access rules.
//!
//! Rules are evaluated in order and the first match decides. When nothing
//! matches, the request must be authenticated.
//!
//! Patterns are Ant-style:
//! - `/exact` (one trailing slash tolerated)
//! - `/prefix/**` (matches `/prefix` itself and everything below it)
//! - `/**` (everything)

use axum::http::Method;

use super::authorities::normalize_role;
use super::authority_set::AuthoritySet;
use super::context::SecurityContext;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Any,
    Exact(String),
    Prefix(String),
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "/**" {
            return Self::Any;
        }
        match pattern.strip_suffix("/**") {
            Some(base) => Self::Prefix(base.to_string()),
            None => Self::Exact(pattern.trim_end_matches('/').to_string()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exact(exact) => {
                path == exact || path.strip_suffix('/').is_some_and(|p| p == exact)
            }
            Self::Prefix(base) => {
                path == base
                    || path
                        .strip_prefix(base.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

static FALLBACK_REQUIREMENT: Requirement = Requirement::Authenticated;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    PermitAll,
    Authenticated,
    AnyAuthority(AuthoritySet),
}

impl Requirement {
    /// `any_role(["ADMIN"])` requires `ROLE_ADMIN`.
    pub fn any_role<'a>(roles: impl IntoIterator<Item = &'a str>) -> Self {
        Self::AnyAuthority(roles.into_iter().map(normalize_role).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Granted,
    /// No identity where one is needed (401).
    Unauthenticated,
    /// Identity present but lacking authority (403).
    Denied,
}

#[derive(Debug, Clone)]
pub struct AccessRule {
    method: Option<Method>,
    patterns: Vec<PathPattern>,
    requirement: Requirement,
}

impl AccessRule {
    pub fn paths<'a>(patterns: impl IntoIterator<Item = &'a str>, requirement: Requirement) -> Self {
        Self {
            method: None,
            patterns: patterns.into_iter().map(PathPattern::parse).collect(),
            requirement,
        }
    }

    pub fn method(method: Method, requirement: Requirement) -> Self {
        Self {
            method: Some(method),
            patterns: vec![PathPattern::Any],
            requirement,
        }
    }

    pub fn any_request(requirement: Requirement) -> Self {
        Self::paths(["/**"], requirement)
    }

    fn matches(&self, method: &Method, path: &str) -> bool {
        self.method.as_ref().is_none_or(|m| m == method)
            && self.patterns.iter().any(|p| p.matches(path))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Public actuator + fallback, CORS preflight, public API, admin-only
    /// area, everything else authenticated.
    pub fn gateway_default() -> Self {
        Self::new(vec![
            AccessRule::paths(
                ["/actuator/health", "/actuator/info", "/fallback/**"],
                Requirement::PermitAll,
            ),
            AccessRule::method(Method::OPTIONS, Requirement::PermitAll),
            AccessRule::paths(["/api/v1/public/**"], Requirement::PermitAll),
            AccessRule::paths(
                ["/api/admin/**"],
                Requirement::any_role(["ADMIN", "SUPER_ADMIN"]),
            ),
            AccessRule::paths(["/api/v1/**"], Requirement::Authenticated),
            AccessRule::any_request(Requirement::Authenticated),
        ])
    }

    pub fn requirement(&self, method: &Method, path: &str) -> &Requirement {
        self.rules
            .iter()
            .find(|rule| rule.matches(method, path))
            .map(|rule| &rule.requirement)
            .unwrap_or(&FALLBACK_REQUIREMENT)
    }

    pub fn evaluate(
        &self,
        method: &Method,
        path: &str,
        ctx: Option<&SecurityContext>,
    ) -> AccessDecision {
        match (self.requirement(method, path), ctx) {
            (Requirement::PermitAll, _) => AccessDecision::Granted,
            (_, None) => AccessDecision::Unauthenticated,
            (Requirement::Authenticated, Some(_)) => AccessDecision::Granted,
            (Requirement::AnyAuthority(required), Some(ctx)) => {
                if required.iter().any(|a| ctx.has_authority(a)) {
                    AccessDecision::Granted
                } else {
                    AccessDecision::Denied
                }
            }
        }
    }
}
