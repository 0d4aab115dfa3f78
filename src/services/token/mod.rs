/*
 * Responsibility
 * - access token (JWT) の署名 / exp / iss / aud 検証
 * - 検証済み payload を DecodedToken に変換して security 層に渡す
 */
pub mod verifier;

pub use verifier::{TokenError, TokenVerifier, VerificationKey, VerifierSettings};
