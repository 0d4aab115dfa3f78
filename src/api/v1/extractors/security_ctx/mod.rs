/*!
 * Security context extractor
 *
 * Responsibility:
 * - 認証済みリクエストのコンテキスト（SecurityContext）を handler に提供する
 * - 型定義は crate::security::context にあり、ここは axum 依存の部分だけ
 */

mod core;

pub use self::core::SecurityCtx;
