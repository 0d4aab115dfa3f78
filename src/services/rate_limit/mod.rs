/*
 * Responsibility
 * - rate limiter が bucket を分けるための key を決める
 * - limiter 本体 (token bucket などのアルゴリズムと保存先) は外部の責務
 */
pub mod key;

pub use key::{KeyResolver, PrincipalOrIpKeyResolver, RateLimitKey};
