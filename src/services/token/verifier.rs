use std::fmt;

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

use crate::security::{ClaimSet, DecodedToken};

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid verification key: {0}")]
    InvalidKey(#[source] jsonwebtoken::errors::Error),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("{0:?} requires {1}")]
    KeyMismatch(Algorithm, &'static str),

    #[error("token verification failed: {0}")]
    Verification(#[from] jsonwebtoken::errors::Error),
}

/// Key material for access-token verification.
#[derive(Clone)]
pub enum VerificationKey {
    /// Shared secret for HS* algorithms.
    Secret(String),
    /// PEM public key for RS*/PS*/ES*/EdDSA.
    Pem(String),
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        match self {
            Self::Secret(_) => f.write_str("Secret(..)"),
            Self::Pem(_) => f.write_str("Pem(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerifierSettings {
    pub algorithm: String,
    pub key: VerificationKey,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway_seconds: u64,
}

/// Access-token verifier.
///
/// Checks signature, `exp`/`nbf` and, when configured, `iss`/`aud`, then
/// hands the payload over as a `DecodedToken`.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(settings: &VerifierSettings) -> Result<Self, TokenError> {
        let algorithm: Algorithm = settings
            .algorithm
            .trim()
            .parse()
            .map_err(|_| TokenError::UnsupportedAlgorithm(settings.algorithm.clone()))?;

        let decoding_key = decoding_key(algorithm, &settings.key)?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = settings.leeway_seconds;
        validation.validate_nbf = true;
        if let Some(issuer) = &settings.issuer {
            validation.set_issuer(&[issuer]);
        }
        match &settings.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    pub fn verify(&self, token: &str) -> Result<DecodedToken, TokenError> {
        let data =
            jsonwebtoken::decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?;

        Ok(DecodedToken::from_claims(ClaimSet::from(data.claims)))
    }
}

fn decoding_key(algorithm: Algorithm, key: &VerificationKey) -> Result<DecodingKey, TokenError> {
    use Algorithm::*;

    match (algorithm, key) {
        (HS256 | HS384 | HS512, VerificationKey::Secret(secret)) => {
            Ok(DecodingKey::from_secret(secret.as_bytes()))
        }
        (HS256 | HS384 | HS512, VerificationKey::Pem(_)) => {
            Err(TokenError::KeyMismatch(algorithm, "a shared secret"))
        }
        (_, VerificationKey::Secret(_)) => Err(TokenError::KeyMismatch(algorithm, "a PEM public key")),
        (RS256 | RS384 | RS512 | PS256 | PS384 | PS512, VerificationKey::Pem(pem)) => {
            DecodingKey::from_rsa_pem(pem.as_bytes()).map_err(TokenError::InvalidKey)
        }
        (ES256 | ES384, VerificationKey::Pem(pem)) => {
            DecodingKey::from_ec_pem(pem.as_bytes()).map_err(TokenError::InvalidKey)
        }
        (EdDSA, VerificationKey::Pem(pem)) => {
            DecodingKey::from_ed_pem(pem.as_bytes()).map_err(TokenError::InvalidKey)
        }
    }
}
