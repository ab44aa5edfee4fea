//! API configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TRADEWIND_DATABASE_URL` - `PostgreSQL` connection string
//! - `TRADEWIND_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `TRADEWIND_HOST` - Bind address (default: 127.0.0.1)
//! - `TRADEWIND_PORT` - Listen port (default: 8000)
//! - `TRADEWIND_JWT_ALGORITHM` - HMAC algorithm: HS256, HS384 or HS512 (default: HS256)
//! - `TRADEWIND_TOKEN_TTL_MINUTES` - Access token lifetime (default: 30)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use jsonwebtoken::Algorithm;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_JWT_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Session token configuration
    pub auth: AuthConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Session token configuration.
///
/// Loaded once at startup and injected into the token service; never read
/// as ambient global state.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC signing secret for session tokens
    pub jwt_secret: SecretString,
    /// Signing algorithm (HS256, HS384 or HS512)
    pub jwt_algorithm: Algorithm,
    /// Token lifetime in minutes
    pub token_ttl_minutes: i64,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("token_ttl_minutes", &self.token_ttl_minutes)
            .finish()
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TRADEWIND_DATABASE_URL")?;
        let host = get_env_or_default("TRADEWIND_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRADEWIND_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("TRADEWIND_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("TRADEWIND_PORT".to_string(), e.to_string()))?;

        let auth = AuthConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            auth,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AuthConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = get_validated_secret("TRADEWIND_JWT_SECRET")?;
        validate_secret_length(&jwt_secret, "TRADEWIND_JWT_SECRET")?;

        let jwt_algorithm =
            parse_hmac_algorithm(&get_env_or_default("TRADEWIND_JWT_ALGORITHM", "HS256"))?;

        let token_ttl_minutes = get_env_or_default("TRADEWIND_TOKEN_TTL_MINUTES", "30")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("TRADEWIND_TOKEN_TTL_MINUTES".to_string(), e.to_string())
            })?;

        Ok(Self {
            jwt_secret,
            jwt_algorithm,
            token_ttl_minutes,
        })
    }
}

/// Parse an HMAC algorithm identifier.
///
/// Only symmetric-key algorithms are accepted; the token service signs and
/// verifies with a single shared secret.
fn parse_hmac_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match raw {
        "HS256" => Ok(Algorithm::HS256),
        "HS384" => Ok(Algorithm::HS384),
        "HS512" => Ok(Algorithm::HS512),
        other => Err(ConfigError::InvalidEnvVar(
            "TRADEWIND_JWT_ALGORITHM".to_string(),
            format!("unsupported algorithm: {other} (expected HS256, HS384 or HS512)"),
        )),
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_JWT_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_high() {
        // Random-looking string should have high entropy
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-jwt-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_secret_length(&secret, "TEST_JWT").is_err());
    }

    #[test]
    fn test_validate_secret_length_valid() {
        let secret = SecretString::from("a".repeat(32));
        assert!(validate_secret_length(&secret, "TEST_JWT").is_ok());
    }

    #[test]
    fn test_parse_hmac_algorithm() {
        assert_eq!(parse_hmac_algorithm("HS256").unwrap(), Algorithm::HS256);
        assert_eq!(parse_hmac_algorithm("HS384").unwrap(), Algorithm::HS384);
        assert_eq!(parse_hmac_algorithm("HS512").unwrap(), Algorithm::HS512);
        assert!(parse_hmac_algorithm("RS256").is_err());
        assert!(parse_hmac_algorithm("none").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8000,
            auth: AuthConfig {
                jwt_secret: SecretString::from("x".repeat(32)),
                jwt_algorithm: Algorithm::HS256,
                token_ttl_minutes: 30,
            },
            sentry_dsn: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8000);
    }

    #[test]
    fn test_auth_config_debug_redacts_secret() {
        let auth = AuthConfig {
            jwt_secret: SecretString::from("super_secret_signing_key_value!!"),
            jwt_algorithm: Algorithm::HS256,
            token_ttl_minutes: 30,
        };

        let debug_output = format!("{auth:?}");
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_signing_key_value"));
    }
}
