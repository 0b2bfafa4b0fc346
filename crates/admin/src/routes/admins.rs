//! Admin account route handlers.
//!
//! Handles account creation, login, and field updates. Login is the only
//! handler reachable without a bearer token.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use storekeep_core::{AdminId, Email, Mobile};

use crate::db::AdminRepository;
use crate::error::AppError;
use crate::services::auth::{hash_password, verify_password};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/v1/admin/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub password: String,
    pub confirm: String,
    pub mobile: String,
    pub email: String,
}

/// Body of `POST /api/v1/admin/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Reply to a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
}

/// Body of `POST /api/v1/admin/email`.
#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub id: AdminId,
    pub email: String,
}

/// Body of `POST /api/v1/admin/mobile`.
#[derive(Debug, Deserialize)]
pub struct UpdateMobileRequest {
    pub id: AdminId,
    pub mobile: String,
}

/// Body of `POST /api/v1/admin/password`.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub id: AdminId,
    pub password: String,
    pub new_password: String,
    pub confirm: String,
}

/// Body of `POST /api/v1/admin/active`.
#[derive(Debug, Deserialize)]
pub struct UpdateActiveRequest {
    pub id: AdminId,
    pub active: bool,
}

/// Reply to a successful account creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: AdminId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create an admin account.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.password != req.confirm {
        return Err(AppError::Conflict(
            "password and confirmation disagree".to_owned(),
        ));
    }

    let mobile = Mobile::parse(&req.mobile).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let email = Email::parse(&req.email).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let password_hash = hash_password(&req.password)?;

    let id = AdminRepository::new(state.pool())
        .create(&req.name, &password_hash, &mobile, &email)
        .await?;

    tracing::info!(%id, name = %req.name, "admin account created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Log an admin in and issue a bearer token.
///
/// Unknown names, deactivated accounts, and wrong passwords all produce the
/// same 401 so the login path leaks nothing about which part failed.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let credentials = AdminRepository::new(state.pool())
        .credentials_for_login(&req.name)
        .await?;

    let Some((id, stored_hash)) = credentials else {
        return Err(AppError::Unauthorized("invalid name or password".to_owned()));
    };

    if !verify_password(&req.password, &stored_hash)? {
        return Err(AppError::Unauthorized("invalid name or password".to_owned()));
    }

    let (token, expires_at) = state.jwt().issue(id)?;

    tracing::info!(%id, "admin logged in");
    Ok(Json(LoginResponse { token, expires_at }))
}

/// Change an account's email address.
pub async fn update_email(
    State(state): State<AppState>,
    Json(req): Json<UpdateEmailRequest>,
) -> Result<StatusCode, AppError> {
    let email = Email::parse(&req.email).map_err(|e| AppError::BadRequest(e.to_string()))?;

    AdminRepository::new(state.pool())
        .set_email(req.id, &email)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change an account's mobile number.
pub async fn update_mobile(
    State(state): State<AppState>,
    Json(req): Json<UpdateMobileRequest>,
) -> Result<StatusCode, AppError> {
    let mobile = Mobile::parse(&req.mobile).map_err(|e| AppError::BadRequest(e.to_string()))?;

    AdminRepository::new(state.pool())
        .set_mobile(req.id, &mobile)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Change an account's password.
///
/// The current password must verify, the new password must differ from it,
/// and the confirmation must match the new password.
pub async fn update_password(
    State(state): State<AppState>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<StatusCode, AppError> {
    if req.new_password == req.password {
        return Err(AppError::ExpectationFailed(
            "the new password can't be the same as the old password".to_owned(),
        ));
    }
    if req.new_password != req.confirm {
        return Err(AppError::Conflict(
            "the new password and confirming password disagree".to_owned(),
        ));
    }

    let repo = AdminRepository::new(state.pool());
    let stored_hash = repo.password_hash(req.id).await?;

    if !verify_password(&req.password, &stored_hash)? {
        return Err(AppError::Unauthorized("wrong password".to_owned()));
    }

    let new_hash = hash_password(&req.new_password)?;
    repo.set_password_hash(req.id, &new_hash).await?;

    tracing::info!(id = %req.id, "admin password changed");
    Ok(StatusCode::NO_CONTENT)
}

/// Flip an account's active flag.
pub async fn update_active(
    State(state): State<AppState>,
    Json(req): Json<UpdateActiveRequest>,
) -> Result<StatusCode, AppError> {
    AdminRepository::new(state.pool())
        .set_active(req.id, req.active)
        .await?;

    tracing::info!(id = %req.id, active = req.active, "admin active flag changed");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_binds_from_json() {
        let req: CreateRequest = serde_json::from_str(
            r#"{"name":"ops","password":"p4ssw0rd","confirm":"p4ssw0rd",
                "mobile":"13812345678","email":"ops@example.com"}"#,
        )
        .unwrap();
        assert_eq!(req.name, "ops");
        assert_eq!(req.password, req.confirm);
    }

    #[test]
    fn test_update_password_request_binds_from_json() {
        let req: UpdatePasswordRequest = serde_json::from_str(
            r#"{"id":1000,"password":"old-pass","new_password":"new-pass","confirm":"new-pass"}"#,
        )
        .unwrap();
        assert_eq!(req.id, AdminId::new(1000));
        assert_eq!(req.new_password, req.confirm);
    }
}
