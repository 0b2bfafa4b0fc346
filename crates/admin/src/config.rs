//! Admin configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREKEEP_DATABASE_URL` - MySQL connection string
//! - `STOREKEEP_JWT_SECRET` - Token signing secret (min 32 chars, high entropy)
//! - `STOREKEEP_SMS_HOST` - SMS gateway base URL
//! - `STOREKEEP_SMS_APPCODE` - SMS gateway app code
//!
//! ## Optional
//! - `STOREKEEP_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREKEEP_PORT` - Listen port (default: 8080)
//! - `STOREKEEP_JWT_ISSUER` - Token issuer claim (default: storekeep-admin)
//! - `STOREKEEP_JWT_EXPIRY_HOURS` - Token lifetime (default: 24)
//! - `STOREKEEP_SMS_DIGITS` - Verification code length (default: 6)
//! - `STOREKEEP_SMS_RESEND_SECS` - Minimum seconds between sends per sign (default: 60)
//! - `STOREKEEP_UPLOAD_ROOT` - Upload store root directory (default: files)
//! - `STOREKEEP_UPLOAD_BASE_URL` - Public URL prefix for uploads (default: http://127.0.0.1:8080)
//! - `STOREKEEP_ORDER_CLOSE_HOURS` - Hours until an unpaid order closes (default: 24)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    "fixme",
    "insert",
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

/// Admin application configuration.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// MySQL database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Token signing configuration
    pub jwt: JwtConfig,
    /// SMS gateway configuration
    pub sms: SmsGatewayConfig,
    /// Upload store configuration
    pub upload: UploadConfig,
    /// Hours between order creation and its closing deadline
    pub order_close_hours: i64,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "production")
    pub sentry_environment: Option<String>,
}

/// Token signing configuration.
///
/// Implements `Debug` manually to redact the signing secret.
#[derive(Clone)]
pub struct JwtConfig {
    /// HS256 signing secret
    pub secret: SecretString,
    /// Issuer claim stamped into every token
    pub issuer: String,
    /// Token lifetime in hours
    pub expiry_hours: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("expiry_hours", &self.expiry_hours)
            .finish()
    }
}

/// SMS gateway configuration.
///
/// Implements `Debug` manually to redact the app code.
#[derive(Clone)]
pub struct SmsGatewayConfig {
    /// Gateway base URL
    pub host: String,
    /// Gateway app code sent in the `Authorization` header
    pub appcode: SecretString,
    /// Number of digits in a verification code
    pub digits: usize,
    /// Minimum seconds between two sends for the same sign
    pub resend_interval_secs: i64,
}

impl std::fmt::Debug for SmsGatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsGatewayConfig")
            .field("host", &self.host)
            .field("appcode", &"[REDACTED]")
            .field("digits", &self.digits)
            .field("resend_interval_secs", &self.resend_interval_secs)
            .finish()
    }
}

/// Upload store configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Root directory of the upload store
    pub root: PathBuf,
    /// Public URL prefix prepended to stored paths
    pub base_url: String,
}

impl AdminConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if the JWT secret fails validation (placeholder detection, entropy
    /// check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = SecretString::from(get_required_env("STOREKEEP_DATABASE_URL")?);
        let host = get_env_or_default("STOREKEEP_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREKEEP_HOST".to_owned(), e.to_string()))?;
        let port = get_env_or_default("STOREKEEP_PORT", "8080")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("STOREKEEP_PORT".to_owned(), e.to_string()))?;

        let jwt = JwtConfig::from_env()?;
        let sms = SmsGatewayConfig::from_env()?;
        let upload = UploadConfig::from_env();

        let order_close_hours = get_env_or_default("STOREKEEP_ORDER_CLOSE_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREKEEP_ORDER_CLOSE_HOURS".to_owned(), e.to_string())
            })?;

        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            jwt,
            sms,
            upload,
            order_close_hours,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = get_validated_secret("STOREKEEP_JWT_SECRET")?;
        validate_secret_length(&secret, "STOREKEEP_JWT_SECRET")?;

        let expiry_hours = get_env_or_default("STOREKEEP_JWT_EXPIRY_HOURS", "24")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREKEEP_JWT_EXPIRY_HOURS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            secret,
            issuer: get_env_or_default("STOREKEEP_JWT_ISSUER", "storekeep-admin"),
            expiry_hours,
        })
    }
}

impl SmsGatewayConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let digits = get_env_or_default("STOREKEEP_SMS_DIGITS", "6")
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREKEEP_SMS_DIGITS".to_owned(), e.to_string())
            })?;
        let resend_interval_secs = get_env_or_default("STOREKEEP_SMS_RESEND_SECS", "60")
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREKEEP_SMS_RESEND_SECS".to_owned(), e.to_string())
            })?;

        Ok(Self {
            host: get_required_env("STOREKEEP_SMS_HOST")?,
            appcode: SecretString::from(get_required_env("STOREKEEP_SMS_APPCODE")?),
            digits,
            resend_interval_secs,
        })
    }
}

impl UploadConfig {
    fn from_env() -> Self {
        Self {
            root: PathBuf::from(get_env_or_default("STOREKEEP_UPLOAD_ROOT", "files")),
            base_url: get_env_or_default("STOREKEEP_UPLOAD_BASE_URL", "http://127.0.0.1:8080"),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_owned()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Validate that a signing secret meets minimum length requirements.
fn validate_secret_length(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_JWT_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
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
            #[allow(clippy::cast_precision_loss)]
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
                var_name.to_owned(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_owned(),
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
    fn test_shannon_entropy_degenerate_inputs() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_shannon_entropy_high() {
        let entropy = shannon_entropy("aB3$xY9!mK2@nL5#");
        assert!(entropy > 3.3);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-signing-key-here", "TEST_VAR");
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::InsecureSecret(_, _)
        ));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("ababababababababababababababab", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_secret_length_too_short() {
        let secret = SecretString::from("short");
        assert!(validate_secret_length(&secret, "TEST_JWT").is_err());
    }

    #[test]
    fn test_jwt_config_debug_redacts_secret() {
        let config = JwtConfig {
            secret: SecretString::from("kM2v9Qx1pL8wZr4tBn6yHs3jDf5gAc7e"),
            issuer: "storekeep-admin".to_owned(),
            expiry_hours: 24,
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("storekeep-admin"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("kM2v9Qx1pL8wZr4tBn6yHs3jDf5gAc7e"));
    }

    #[test]
    fn test_socket_addr() {
        let config = AdminConfig {
            database_url: SecretString::from("mysql://localhost/storekeep"),
            host: "127.0.0.1".parse().unwrap(),
            port: 8080,
            jwt: JwtConfig {
                secret: SecretString::from("x".repeat(32)),
                issuer: "storekeep-admin".to_owned(),
                expiry_hours: 24,
            },
            sms: SmsGatewayConfig {
                host: "https://sms.example.test/send".to_owned(),
                appcode: SecretString::from("appcode"),
                digits: 6,
                resend_interval_secs: 60,
            },
            upload: UploadConfig {
                root: PathBuf::from("files"),
                base_url: "http://127.0.0.1:8080".to_owned(),
            },
            order_close_hours: 24,
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 8080);
    }
}
