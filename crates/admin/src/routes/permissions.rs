//! RBAC route handlers: roles, URL grants, and admin/role relations.
//!
//! Mutations against an inactive role (or an inactive admin, for relations)
//! are rejected with 412 before touching the grant tables.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use storekeep_core::{AdminId, RoleId};

use crate::db::{AdminRepository, PermissionRepository, RelationRepository, RoleRepository};
use crate::error::AppError;
use crate::models::{Permission, Relation, Role};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/v1/permission/role/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub intro: String,
}

/// Reply to a successful role creation.
#[derive(Debug, Serialize)]
pub struct CreatedRoleResponse {
    pub id: RoleId,
}

/// Body of `POST /api/v1/permission/role/modify`.
#[derive(Debug, Deserialize)]
pub struct ModifyRoleRequest {
    pub id: RoleId,
    pub name: String,
    pub intro: String,
}

/// Body of `POST /api/v1/permission/role/active`.
#[derive(Debug, Deserialize)]
pub struct RoleActiveRequest {
    pub id: RoleId,
    pub active: bool,
}

/// Body of the URL grant/revoke endpoints.
#[derive(Debug, Deserialize)]
pub struct UrlGrantRequest {
    pub url: String,
    pub role_id: RoleId,
}

/// Body of `POST /api/v1/permission/url/roles`.
#[derive(Debug, Deserialize)]
pub struct UrlRolesRequest {
    pub url: String,
}

/// Body of the relation endpoints.
#[derive(Debug, Deserialize)]
pub struct RelationRequest {
    pub admin_id: AdminId,
    pub role_id: RoleId,
}

/// Body of `POST /api/v1/permission/relation/list`.
#[derive(Debug, Deserialize)]
pub struct RelationListRequest {
    pub admin_id: AdminId,
}

// =============================================================================
// Guards
// =============================================================================

/// Reject with 412 unless the role exists and is active.
async fn ensure_role_active(state: &AppState, role_id: RoleId) -> Result<(), AppError> {
    let role = RoleRepository::new(state.pool()).get_active(role_id).await?;
    if role.is_none() {
        return Err(AppError::PreconditionFailed(
            "the role is not activated".to_owned(),
        ));
    }
    Ok(())
}

/// Reject with 412 unless the admin exists and is active.
async fn ensure_admin_active(state: &AppState, admin_id: AdminId) -> Result<(), AppError> {
    let active = AdminRepository::new(state.pool()).is_active(admin_id).await?;
    if !active {
        return Err(AppError::PreconditionFailed(
            "the admin is not activated".to_owned(),
        ));
    }
    Ok(())
}

// =============================================================================
// Role Handlers
// =============================================================================

/// Create a role.
pub async fn create_role(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = RoleRepository::new(state.pool())
        .create(&req.name, &req.intro)
        .await?;

    tracing::info!(%id, name = %req.name, "role created");
    Ok((StatusCode::CREATED, Json(CreatedRoleResponse { id })))
}

/// Rename a role and replace its description.
pub async fn modify_role(
    State(state): State<AppState>,
    Json(req): Json<ModifyRoleRequest>,
) -> Result<StatusCode, AppError> {
    RoleRepository::new(state.pool())
        .update(req.id, &req.name, &req.intro)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Flip a role's active flag.
pub async fn set_role_active(
    State(state): State<AppState>,
    Json(req): Json<RoleActiveRequest>,
) -> Result<StatusCode, AppError> {
    RoleRepository::new(state.pool())
        .set_active(req.id, req.active)
        .await?;

    tracing::info!(id = %req.id, active = req.active, "role active flag changed");
    Ok(StatusCode::NO_CONTENT)
}

/// List every role.
pub async fn list_roles(State(state): State<AppState>) -> Result<Json<Vec<Role>>, AppError> {
    let roles = RoleRepository::new(state.pool()).list().await?;
    Ok(Json(roles))
}

// =============================================================================
// URL Permission Handlers
// =============================================================================

/// Grant a URL to a role.
pub async fn grant_url(
    State(state): State<AppState>,
    Json(req): Json<UrlGrantRequest>,
) -> Result<StatusCode, AppError> {
    ensure_role_active(&state, req.role_id).await?;

    PermissionRepository::new(state.pool())
        .grant(&req.url, req.role_id)
        .await?;

    tracing::info!(url = %req.url, role_id = %req.role_id, "url granted to role");
    Ok(StatusCode::CREATED)
}

/// Revoke a URL from a role.
pub async fn revoke_url(
    State(state): State<AppState>,
    Json(req): Json<UrlGrantRequest>,
) -> Result<StatusCode, AppError> {
    ensure_role_active(&state, req.role_id).await?;

    PermissionRepository::new(state.pool())
        .revoke(&req.url, req.role_id)
        .await?;

    tracing::info!(url = %req.url, role_id = %req.role_id, "url revoked from role");
    Ok(StatusCode::NO_CONTENT)
}

/// The active roles granted a URL, sorted for stable output.
pub async fn roles_for_url(
    State(state): State<AppState>,
    Json(req): Json<UrlRolesRequest>,
) -> Result<Json<Vec<RoleId>>, AppError> {
    let roles = PermissionRepository::new(state.pool())
        .roles_for_url(&req.url)
        .await?;

    let mut roles: Vec<RoleId> = roles.into_iter().collect();
    roles.sort_unstable();
    Ok(Json(roles))
}

/// List every grant.
pub async fn list_permissions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Permission>>, AppError> {
    let permissions = PermissionRepository::new(state.pool()).list().await?;
    Ok(Json(permissions))
}

// =============================================================================
// Relation Handlers
// =============================================================================

/// Assign a role to an admin.
pub async fn assign_role(
    State(state): State<AppState>,
    Json(req): Json<RelationRequest>,
) -> Result<StatusCode, AppError> {
    ensure_admin_active(&state, req.admin_id).await?;
    ensure_role_active(&state, req.role_id).await?;

    RelationRepository::new(state.pool())
        .assign(req.admin_id, req.role_id)
        .await?;

    tracing::info!(admin_id = %req.admin_id, role_id = %req.role_id, "role assigned");
    Ok(StatusCode::CREATED)
}

/// Remove a role from an admin.
pub async fn remove_role(
    State(state): State<AppState>,
    Json(req): Json<RelationRequest>,
) -> Result<StatusCode, AppError> {
    ensure_admin_active(&state, req.admin_id).await?;

    RelationRepository::new(state.pool())
        .remove(req.admin_id, req.role_id)
        .await?;

    tracing::info!(admin_id = %req.admin_id, role_id = %req.role_id, "role removed");
    Ok(StatusCode::NO_CONTENT)
}

/// List an admin's role assignments.
pub async fn list_relations(
    State(state): State<AppState>,
    Json(req): Json<RelationListRequest>,
) -> Result<Json<Vec<Relation>>, AppError> {
    ensure_admin_active(&state, req.admin_id).await?;

    let relations = RelationRepository::new(state.pool())
        .list_for_admin(req.admin_id)
        .await?;
    Ok(Json(relations))
}
