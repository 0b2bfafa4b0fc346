//! SMS verification-code service.
//!
//! Issues numeric codes, persists them keyed by the caller's `sign` token,
//! and delivers them through a third-party HTTP gateway. A successful check
//! consumes the stored code.

use axum::http::StatusCode;
use chrono::Utc;
use rand::Rng;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

use storekeep_core::Mobile;

use crate::config::SmsGatewayConfig;
use crate::db::{RepositoryError, SmsRepository};

/// Errors from issuing or checking a verification code.
#[derive(Debug, Error)]
pub enum SmsError {
    /// A code for this sign was sent too recently.
    #[error("a code was sent too recently for this sign")]
    ResendTooSoon,
    /// The submitted code does not match the stored one (or none is stored).
    #[error("verification code mismatch")]
    CodeMismatch,
    /// The gateway answered but did not accept the message.
    #[error("sms gateway rejected the message: {0}")]
    Gateway(String),
    /// The gateway could not be reached or answered garbage.
    #[error("sms gateway request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The code store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SmsError {
    /// HTTP status for the error, used by the application error responder.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ResendTooSoon => StatusCode::CONFLICT,
            Self::CodeMismatch => StatusCode::EXPECTATION_FAILED,
            Self::Gateway(_) | Self::Http(_) => StatusCode::BAD_GATEWAY,
            Self::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Reply envelope of the SMS gateway.
#[derive(Debug, Deserialize)]
struct SendSmsReply {
    #[serde(rename = "Message", default)]
    message: String,
    #[serde(rename = "RequestID", default)]
    request_id: String,
    #[serde(rename = "Code", default)]
    code: String,
}

/// Client for the third-party SMS gateway.
#[derive(Clone)]
pub struct SmsClient {
    http: Client,
    host: String,
    appcode: SecretString,
    digits: usize,
    resend_interval_secs: i64,
}

impl SmsClient {
    /// Create a client from the loaded configuration.
    #[must_use]
    pub fn new(http: Client, config: &SmsGatewayConfig) -> Self {
        Self {
            http,
            host: config.host.clone(),
            appcode: config.appcode.clone(),
            digits: config.digits,
            resend_interval_secs: config.resend_interval_secs,
        }
    }

    /// Issue a verification code for `mobile`, correlated by `sign`.
    ///
    /// Enforces the resend interval, stores the code, then delivers it. The
    /// row is stored before delivery, so a gateway failure leaves the code
    /// checkable.
    ///
    /// # Errors
    ///
    /// Returns `SmsError::ResendTooSoon` inside the resend window,
    /// `SmsError::Gateway`/`SmsError::Http` on delivery failure, and
    /// repository errors from the code store.
    pub async fn send(
        &self,
        repo: &SmsRepository<'_>,
        mobile: &Mobile,
        sign: &str,
    ) -> Result<(), SmsError> {
        let now = Utc::now().timestamp();

        if let Some(sent_at) = repo.sent_at_by_sign(sign).await?
            && now - sent_at < self.resend_interval_secs
        {
            return Err(SmsError::ResendTooSoon);
        }

        let code = generate_code(self.digits);
        repo.insert(mobile, now, &code, sign).await?;

        self.deliver(mobile, &code).await?;

        tracing::info!(sign, mobile = %mobile, "verification code sent");
        Ok(())
    }

    /// Check a submitted code against the stored one for `sign`.
    ///
    /// A match consumes the stored row.
    ///
    /// # Errors
    ///
    /// Returns `SmsError::CodeMismatch` when the codes differ or no code is
    /// pending for the sign.
    pub async fn check(
        &self,
        repo: &SmsRepository<'_>,
        code: &str,
        sign: &str,
    ) -> Result<(), SmsError> {
        let stored = repo.code_by_sign(sign).await?;

        match stored {
            Some(stored) if stored == code => {
                repo.delete_by_sign(sign).await?;
                tracing::info!(sign, "verification succeeded");
                Ok(())
            }
            _ => {
                tracing::warn!(sign, "verification failed");
                Err(SmsError::CodeMismatch)
            }
        }
    }

    /// Deliver a code through the gateway.
    async fn deliver(&self, mobile: &Mobile, code: &str) -> Result<(), SmsError> {
        let reply = self
            .http
            .get(&self.host)
            .query(&[("code", code), ("phone", mobile.as_str()), ("skin", "1")])
            .header(
                "Authorization",
                format!("APPCODE {}", self.appcode.expose_secret()),
            )
            .send()
            .await?
            .json::<SendSmsReply>()
            .await?;

        if reply.code != "OK" {
            return Err(SmsError::Gateway(format!(
                "code={} message={} request_id={}",
                reply.code, reply.message, reply.request_id
            )));
        }

        Ok(())
    }
}

/// Generate a numeric verification code of `digits` digits.
fn generate_code(digits: usize) -> String {
    let mut rng = rand::rng();
    (0..digits)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_code_shape() {
        for digits in [4, 6, 8] {
            let code = generate_code(digits);
            assert_eq!(code.len(), digits);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_generate_code_not_constant() {
        // Sixty draws of a 6-digit code colliding pairwise is ~astronomically
        // unlikely; a constant generator would fail immediately.
        let codes: std::collections::HashSet<String> =
            (0..60).map(|_| generate_code(6)).collect();
        assert!(codes.len() > 1);
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(SmsError::ResendTooSoon.status(), StatusCode::CONFLICT);
        assert_eq!(SmsError::CodeMismatch.status(), StatusCode::EXPECTATION_FAILED);
        assert_eq!(
            SmsError::Gateway("no".to_owned()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SmsError::Repository(RepositoryError::NotFound).status(),
            StatusCode::NOT_FOUND
        );
    }
}
