//! Authentication extractor for admin routes.
//!
//! Provides an extractor that requires a verified bearer token and yields
//! the calling admin's identity.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};

use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// Rejects with 401 Unauthorized when the `Authorization` header is missing,
/// malformed, or carries a token that fails verification.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(admin): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("admin {}", admin.id)
/// }
/// ```
pub struct RequireAuth(pub CurrentAdmin);

/// Error returned when authentication is required but absent or invalid.
pub struct AuthRejection(&'static str);

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (StatusCode::UNAUTHORIZED, self.0).into_response()
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AuthRejection("missing bearer token"))?;

        let claims = state
            .jwt()
            .verify(token)
            .map_err(|_| AuthRejection("invalid token"))?;
        let id = claims
            .admin_id()
            .map_err(|_| AuthRejection("invalid token"))?;

        Ok(Self(CurrentAdmin { id }))
    }
}

/// Extract the token from an `Authorization: Bearer ...` header.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts_with_auth(value: &str) -> Parts {
        let (parts, ()) = Request::builder()
            .uri("/api/v1/order/info")
            .header(AUTHORIZATION, value)
            .body(())
            .expect("request builds")
            .into_parts();
        parts
    }

    #[test]
    fn test_bearer_token_extraction() {
        let parts = parts_with_auth("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&parts), Some("abc.def.ghi"));
    }

    #[test]
    fn test_bearer_token_rejects_other_schemes() {
        let parts = parts_with_auth("Basic dXNlcjpwdw==");
        assert_eq!(bearer_token(&parts), None);

        let parts = parts_with_auth("Bearer ");
        assert_eq!(bearer_token(&parts), None);
    }
}
