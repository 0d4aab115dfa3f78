/*
 * Responsibility
 * - 検証済み JWT の claim を表現する型 (ClaimValue / ClaimSet / DecodedToken)
 * - 形が不定の claim (map of map of list ...) を安全に取り出す helper
 *
 * Notes
 * - 署名検証は services::token の責務。ここに来る token は検証済みの前提
 * - 型が合わない claim は「存在しない」として扱い、エラーにはしない
 */
use std::collections::BTreeMap;

use serde_json::{Number, Value};

pub type ClaimMap = BTreeMap<String, ClaimValue>;

/// A single claim value as it appears in a decoded token payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ClaimValue>),
    Map(ClaimMap),
}

impl ClaimValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ClaimValue]> {
        match self {
            ClaimValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ClaimMap> {
        match self {
            ClaimValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ClaimValue::Null)
    }

    /// Scalar claims rendered as text (`"42"` for a number claim).
    /// Lists and maps have no textual form here.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ClaimValue::String(s) => Some(s.clone()),
            ClaimValue::Number(n) => Some(n.to_string()),
            ClaimValue::Bool(b) => Some(b.to_string()),
            ClaimValue::Null | ClaimValue::List(_) | ClaimValue::Map(_) => None,
        }
    }
}

impl From<Value> for ClaimValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ClaimValue::Null,
            Value::Bool(b) => ClaimValue::Bool(b),
            Value::Number(n) => ClaimValue::Number(n),
            Value::String(s) => ClaimValue::String(s),
            Value::Array(items) => ClaimValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                ClaimValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Claim name -> value for one token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimSet {
    claims: ClaimMap,
}

impl ClaimSet {
    pub fn get(&self, name: &str) -> Option<&ClaimValue> {
        self.claims.get(name)
    }

    pub fn get_map(&self, name: &str) -> Option<&ClaimMap> {
        self.get(name).and_then(ClaimValue::as_map)
    }

    pub fn get_text(&self, name: &str) -> Option<String> {
        self.get(name).and_then(ClaimValue::to_text)
    }
}

impl From<serde_json::Map<String, Value>> for ClaimSet {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            claims: map.into_iter().map(|(k, v)| (k, v.into())).collect(),
        }
    }
}

impl TryFrom<Value> for ClaimSet {
    type Error = Value;

    /// Only a JSON object is a claim set; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(other),
        }
    }
}

/// A token whose signature and time claims were already checked upstream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedToken {
    pub claims: ClaimSet,
    pub subject: Option<String>,
}

impl DecodedToken {
    /// Lifts the `sub` claim into `subject`; numbers and booleans are rendered as text.
    pub fn from_claims(claims: ClaimSet) -> Self {
        let subject = claims.get_text("sub");
        Self { claims, subject }
    }
}
