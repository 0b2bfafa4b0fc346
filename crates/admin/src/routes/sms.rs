//! SMS verification route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use storekeep_core::Mobile;

use crate::db::SmsRepository;
use crate::error::AppError;
use crate::state::AppState;

/// Body of `POST /api/v1/sms/send`.
#[derive(Debug, Deserialize)]
pub struct SendRequest {
    pub mobile: String,
    pub sign: String,
}

/// Body of `POST /api/v1/sms/check`.
#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub code: String,
    pub sign: String,
}

/// Issue a verification code and deliver it through the gateway.
pub async fn send(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<StatusCode, AppError> {
    let mobile = Mobile::parse(&req.mobile).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let repo = SmsRepository::new(state.pool());
    state.sms().send(&repo, &mobile, &req.sign).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Check a submitted verification code.
pub async fn check(
    State(state): State<AppState>,
    Json(req): Json<CheckRequest>,
) -> Result<StatusCode, AppError> {
    let repo = SmsRepository::new(state.pool());
    state.sms().check(&repo, &req.code, &req.sign).await?;

    Ok(StatusCode::NO_CONTENT)
}
