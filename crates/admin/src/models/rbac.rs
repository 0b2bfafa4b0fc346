//! RBAC domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{AdminId, RoleId};

/// A named permission bucket assignable to admins.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Role {
    /// Unique role id.
    pub id: RoleId,
    /// Unique role name.
    pub name: String,
    /// Free-form description.
    pub intro: String,
    /// Inactive roles are ignored by every resolution query.
    pub active: bool,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

/// A grant of a URL to a role.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Permission {
    /// Request path the grant covers.
    pub url: String,
    /// Granted role.
    pub role_id: RoleId,
    /// When the grant was recorded.
    pub created_at: DateTime<Utc>,
}

/// The assignment of a role to an admin.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct Relation {
    /// Assigned admin.
    pub admin_id: AdminId,
    /// Assigned role.
    pub role_id: RoleId,
}
