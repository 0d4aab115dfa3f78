/*
 * Responsibility
 * - Bearer token の検証 → SecurityContext を extensions に入れる
 * - path ベースのアクセスルール適用 (401 / 403)
 */
pub mod access;
