/*
 * Responsibility
 * - token claim → 権限 (authorities) / principal の解決
 * - path ベースのアクセスルール
 * - middleware から呼ばれる純粋なロジック (http::Method 以外の HTTP 型には依存しない)
 */
pub mod access;
pub mod authorities;
pub mod authority_set;
pub mod claims;
pub mod context;
pub mod scope;

pub use access::{AccessDecision, AccessPolicy, AccessRule, PathPattern, Requirement};
pub use authorities::{AuthorityResolution, AuthorityResolver, normalize_role};
pub use authority_set::AuthoritySet;
pub use claims::{ClaimSet, ClaimValue, DecodedToken};
pub use context::SecurityContext;
pub use scope::ScopeAuthorityMapper;
