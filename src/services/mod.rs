/*
 * Responsibility
 * - middleware / handler から使う service 群
 * - 外部との境界 (token 検証, rate limit key) をここに閉じ込める
 */
pub mod rate_limit;
pub mod token;
