//! URL permission gate.
//!
//! Decision chain: admin id from the bearer token, the admin's active role
//! set, the role set granted for the request path, then a set intersection.
//! An empty set on either side makes the gate fall through and let the
//! request pass. That is a long-standing policy gap; it is preserved here
//! rather than silently tightening the contract.

use std::collections::HashSet;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use storekeep_core::RoleId;

use crate::db::{AdminRepository, PermissionRepository, RelationRepository};
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Outcome of the authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The admin holds a role granted for the URL.
    Granted,
    /// Either side of the check resolved to an empty set; the gate does not
    /// apply and the request passes.
    Fallthrough,
    /// Both sets are non-empty and disjoint.
    Denied,
}

/// Decide access from the two resolved role sets.
#[must_use]
pub fn decide(url_roles: &HashSet<RoleId>, admin_roles: &HashSet<RoleId>) -> AccessDecision {
    if url_roles.is_empty() || admin_roles.is_empty() {
        return AccessDecision::Fallthrough;
    }
    if url_roles.iter().any(|role| admin_roles.contains(role)) {
        AccessDecision::Granted
    } else {
        AccessDecision::Denied
    }
}

/// Middleware enforcing the URL permission gate.
///
/// # Errors
///
/// Returns `AppError::PermissionDenied` when the decision is
/// [`AccessDecision::Denied`]; database failures surface as `AppError`.
pub async fn check_permission(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let url = req.uri().path().to_owned();

    let url_roles = PermissionRepository::new(state.pool())
        .roles_for_url(&url)
        .await?;
    let admin_roles = RelationRepository::new(state.pool())
        .roles_for_admin(admin.id)
        .await?;

    match decide(&url_roles, &admin_roles) {
        AccessDecision::Granted => Ok(next.run(req).await),
        AccessDecision::Fallthrough => {
            tracing::debug!(%url, admin_id = %admin.id, "permission gate fell through");
            Ok(next.run(req).await)
        }
        AccessDecision::Denied => {
            tracing::warn!(%url, admin_id = %admin.id, "permission denied");
            Err(AppError::PermissionDenied(url))
        }
    }
}

/// Middleware rejecting requests from deactivated accounts.
///
/// The flag is read from the database on every request, so deactivation
/// takes effect before the token expires.
///
/// # Errors
///
/// Returns `AppError::PermissionDenied` for inactive accounts and
/// `AppError::Database` when the account row is missing.
pub async fn require_active(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let active = AdminRepository::new(state.pool())
        .is_active(admin.id)
        .await?;

    if !active {
        return Err(AppError::PermissionDenied("account is inactive".to_owned()));
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(ids: &[u64]) -> HashSet<RoleId> {
        ids.iter().copied().map(RoleId::new).collect()
    }

    #[test]
    fn test_decide_grants_on_intersection() {
        assert_eq!(
            decide(&roles(&[1, 2]), &roles(&[2, 3])),
            AccessDecision::Granted
        );
        assert_eq!(decide(&roles(&[5]), &roles(&[5])), AccessDecision::Granted);
    }

    #[test]
    fn test_decide_denies_disjoint_sets() {
        assert_eq!(
            decide(&roles(&[1, 2]), &roles(&[3, 4])),
            AccessDecision::Denied
        );
    }

    #[test]
    fn test_decide_falls_through_on_empty_sets() {
        // The documented policy gap: an unregistered URL or a role-less
        // admin bypasses the gate entirely.
        assert_eq!(
            decide(&roles(&[]), &roles(&[1])),
            AccessDecision::Fallthrough
        );
        assert_eq!(
            decide(&roles(&[1]), &roles(&[])),
            AccessDecision::Fallthrough
        );
        assert_eq!(decide(&roles(&[]), &roles(&[])), AccessDecision::Fallthrough);
    }
}
