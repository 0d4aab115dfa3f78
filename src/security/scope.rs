//! Base authorities derived from the OAuth2 scope claim.
//!
//! The first present claim among `scope` / `scp` is used. A string value is
//! space-delimited; a list value contributes its string elements. Each scope
//! becomes `SCOPE_<scope>`.

use super::authority_set::AuthoritySet;
use super::claims::{ClaimSet, ClaimValue};

pub const DEFAULT_SCOPE_CLAIMS: [&str; 2] = ["scope", "scp"];
pub const SCOPE_PREFIX: &str = "SCOPE_";

#[derive(Debug, Clone)]
pub struct ScopeAuthorityMapper {
    claim_names: Vec<String>,
    prefix: String,
}

impl Default for ScopeAuthorityMapper {
    fn default() -> Self {
        Self::new(DEFAULT_SCOPE_CLAIMS.iter().copied(), SCOPE_PREFIX)
    }
}

impl ScopeAuthorityMapper {
    pub fn new<'a>(claim_names: impl IntoIterator<Item = &'a str>, prefix: &str) -> Self {
        Self {
            claim_names: claim_names.into_iter().map(str::to_string).collect(),
            prefix: prefix.to_string(),
        }
    }

    pub fn map(&self, claims: &ClaimSet) -> AuthoritySet {
        let Some(value) = self
            .claim_names
            .iter()
            .filter_map(|name| claims.get(name))
            .find(|v| !v.is_null())
        else {
            return AuthoritySet::new();
        };

        scopes(value)
            .into_iter()
            .map(|scope| format!("{}{}", self.prefix, scope))
            .collect()
    }
}

fn scopes(value: &ClaimValue) -> Vec<String> {
    match value {
        ClaimValue::String(s) => s.split_whitespace().map(str::to_string).collect(),
        ClaimValue::List(items) => items
            .iter()
            .filter_map(ClaimValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}
