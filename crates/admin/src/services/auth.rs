//! Credential handling: bcrypt password hashing and HS256 bearer tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use storekeep_core::AdminId;

use crate::config::JwtConfig;

/// Errors from token or password handling.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token is expired.
    #[error("token expired")]
    TokenExpired,
    /// The token failed verification.
    #[error("invalid token: {0}")]
    InvalidToken(String),
    /// The Authorization header is missing or not a bearer token.
    #[error("missing bearer token")]
    MissingToken,
    /// Hashing or verification failed internally.
    #[error("credential error: {0}")]
    Credential(String),
}

/// Claims carried by an admin bearer token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Admin id, as a string per JWT convention.
    pub sub: String,
    /// Issued-at unix time.
    pub iat: i64,
    /// Expiry unix time.
    pub exp: i64,
    /// Issuer.
    pub iss: String,
}

impl Claims {
    /// The admin id encoded in the subject claim.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if the subject is not numeric.
    pub fn admin_id(&self) -> Result<AdminId, AuthError> {
        self.sub
            .parse::<u64>()
            .map(AdminId::new)
            .map_err(|_| AuthError::InvalidToken("non-numeric subject".to_owned()))
    }
}

/// Issues and verifies admin bearer tokens.
#[derive(Clone)]
pub struct JwtManager {
    issuer: String,
    expiry: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    /// Create a manager from the loaded configuration.
    #[must_use]
    pub fn new(config: &JwtConfig) -> Self {
        let secret = config.secret.expose_secret().as_bytes();
        Self {
            issuer: config.issuer.clone(),
            expiry: Duration::hours(config.expiry_hours),
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Issue a token for an admin; returns the token and its expiry unix time.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Credential` if encoding fails.
    pub fn issue(&self, admin_id: AdminId) -> Result<(String, i64), AuthError> {
        let now = Utc::now();
        let exp = now + self.expiry;

        let claims = Claims {
            sub: admin_id.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Credential(e.to_string()))?;

        Ok((token, exp.timestamp()))
    }

    /// Verify a token and return its claims.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenExpired` for expired tokens and
    /// `AuthError::InvalidToken` for anything else that fails validation.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        let data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::InvalidToken(e.to_string()),
                }
            })?;

        Ok(data.claims)
    }
}

/// Hash a password for storage.
///
/// # Errors
///
/// Returns `AuthError::Credential` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(|e| AuthError::Credential(e.to_string()))
}

/// Compare a candidate password against a stored hash.
///
/// # Errors
///
/// Returns `AuthError::Credential` if the stored hash is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::Credential(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn test_manager() -> JwtManager {
        JwtManager::new(&JwtConfig {
            secret: SecretString::from("kM2v9Qx1pL8wZr4tBn6yHs3jDf5gAc7e"),
            issuer: "storekeep-admin".to_owned(),
            expiry_hours: 24,
        })
    }

    #[test]
    fn test_issue_and_verify_token() {
        let manager = test_manager();

        let (token, exp) = manager.issue(AdminId::new(1000)).unwrap();
        assert!(exp > Utc::now().timestamp());

        let claims = manager.verify(&token).unwrap();
        assert_eq!(claims.sub, "1000");
        assert_eq!(claims.iss, "storekeep-admin");
        assert_eq!(claims.admin_id().unwrap(), AdminId::new(1000));
    }

    #[test]
    fn test_verify_garbage_token() {
        let manager = test_manager();
        assert!(matches!(
            manager.verify("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_rejects_other_issuer() {
        let manager = test_manager();
        let other = JwtManager::new(&JwtConfig {
            secret: SecretString::from("kM2v9Qx1pL8wZr4tBn6yHs3jDf5gAc7e"),
            issuer: "someone-else".to_owned(),
            expiry_hours: 24,
        });

        let (token, _) = other.issue(AdminId::new(1)).unwrap();
        assert!(manager.verify(&token).is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hashed = hash_password("s3cure-enough").unwrap();
        assert!(verify_password("s3cure-enough", &hashed).unwrap());
        assert!(!verify_password("wrong-password", &hashed).unwrap());
    }

    #[test]
    fn test_claims_rejects_non_numeric_subject() {
        let claims = Claims {
            sub: "not-a-number".to_owned(),
            iat: 0,
            exp: 0,
            iss: "storekeep-admin".to_owned(),
        };
        assert!(claims.admin_id().is_err());
    }
}
