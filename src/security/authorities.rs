//! Token claims → authorities + principal name.
//!
//! Authorities are the union, in this order, of:
//! - base scope authorities (`ScopeAuthorityMapper`)
//! - realm roles from `realm_access.roles`
//! - client roles from every `resource_access.<client>.roles`
//!
//! Roles are trimmed, empty ones dropped, and prefixed with `ROLE_` unless
//! they already carry it. Malformed claim shapes contribute nothing.

use serde::Serialize;

use super::authority_set::AuthoritySet;
use super::claims::{ClaimMap, ClaimSet, ClaimValue, DecodedToken};
use super::scope::ScopeAuthorityMapper;

pub const REALM_ACCESS_CLAIM: &str = "realm_access";
pub const RESOURCE_ACCESS_CLAIM: &str = "resource_access";
pub const ROLES_CLAIM: &str = "roles";
pub const ROLE_PREFIX: &str = "ROLE_";

const PRINCIPAL_CLAIMS: [&str; 2] = ["preferred_username", "email"];
pub const UNKNOWN_PRINCIPAL: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityResolution {
    pub authorities: AuthoritySet,
    pub principal_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct AuthorityResolver {
    scopes: ScopeAuthorityMapper,
}

impl AuthorityResolver {
    pub fn new(scopes: ScopeAuthorityMapper) -> Self {
        Self { scopes }
    }

    pub fn resolve(&self, claims: &ClaimSet, subject: Option<&str>) -> AuthorityResolution {
        let mut authorities = self.scopes.map(claims);
        authorities.extend(realm_roles(claims));
        authorities.extend(resource_roles(claims));

        AuthorityResolution {
            authorities,
            principal_name: principal_name(claims, subject),
        }
    }

    pub fn resolve_token(&self, token: &DecodedToken) -> AuthorityResolution {
        self.resolve(&token.claims, token.subject.as_deref())
    }
}

/// `ROLE_` prefix, applied at most once. Case-sensitive.
pub fn normalize_role(role: &str) -> String {
    if role.starts_with(ROLE_PREFIX) {
        role.to_string()
    } else {
        format!("{ROLE_PREFIX}{role}")
    }
}

fn realm_roles(claims: &ClaimSet) -> Vec<String> {
    claims
        .get_map(REALM_ACCESS_CLAIM)
        .map(roles_of)
        .unwrap_or_default()
}

fn resource_roles(claims: &ClaimSet) -> Vec<String> {
    let Some(clients) = claims.get_map(RESOURCE_ACCESS_CLAIM) else {
        return Vec::new();
    };

    clients
        .values()
        .filter_map(ClaimValue::as_map)
        .flat_map(roles_of)
        .collect()
}

fn roles_of(access: &ClaimMap) -> Vec<String> {
    let Some(roles) = access.get(ROLES_CLAIM).and_then(ClaimValue::as_list) else {
        return Vec::new();
    };

    roles
        .iter()
        .filter_map(ClaimValue::as_str)
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(normalize_role)
        .collect()
}

fn principal_name(claims: &ClaimSet, subject: Option<&str>) -> String {
    PRINCIPAL_CLAIMS
        .iter()
        .map(|name| claims.get_text(name))
        .chain(std::iter::once(subject.map(str::to_string)))
        .flatten()
        .map(|candidate| candidate.trim().to_string())
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| UNKNOWN_PRINCIPAL.to_string())
}
