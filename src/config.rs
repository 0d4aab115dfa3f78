/*
 * Responsibility
 * - 環境変数の読み込み (JWT 検証鍵, CORS 許可 origin, timeout など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::services::token::{VerificationKey, VerifierSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<String>) -> Self {
        match value
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

pub const DEFAULT_CORS_ORIGIN_PATTERNS: &str = "http://localhost:*,http://127.0.0.1:*";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub jwt: VerifierSettings,

    pub cors_allowed_origin_patterns: Vec<String>,
    pub cors_max_age_seconds: u64,

    pub request_timeout_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key → value lookup.
    pub fn from_source(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port: u16 = match get("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(get("APP_ENV"));

        let algorithm = get("JWT_ALGORITHM").unwrap_or_else(|| "RS256".to_string());

        // Either a PEM public key or a shared secret (HS*), never both.
        let key = match (non_empty(get("JWT_PUBLIC_KEY_PEM")), non_empty(get("JWT_HMAC_SECRET"))) {
            (Some(pem), None) => VerificationKey::Pem(pem.replace("\\n", "\n")),
            (None, Some(secret)) => VerificationKey::Secret(secret),
            (Some(_), Some(_)) => return Err(ConfigError::Invalid("JWT_HMAC_SECRET")),
            (None, None) => return Err(ConfigError::Missing("JWT_PUBLIC_KEY_PEM")),
        };

        let leeway_seconds = parse_or(&get, "JWT_LEEWAY_SECONDS", 60)?;

        let jwt = VerifierSettings {
            algorithm,
            key,
            issuer: non_empty(get("JWT_ISSUER")),
            audience: non_empty(get("JWT_AUDIENCE")),
            leeway_seconds,
        };

        let cors_allowed_origin_patterns = get("CORS_ALLOWED_ORIGIN_PATTERNS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGIN_PATTERNS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let cors_max_age_seconds = parse_or(&get, "CORS_MAX_AGE_SECONDS", 3600)?;
        let request_timeout_seconds = parse_or(&get, "REQUEST_TIMEOUT_SECONDS", 30)?;

        Ok(Self {
            addr,
            app_env,
            jwt,
            cors_allowed_origin_patterns,
            cors_max_age_seconds,
            request_timeout_seconds,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or(
    get: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: u64,
) -> Result<u64, ConfigError> {
    match get(key) {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}
