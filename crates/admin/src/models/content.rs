//! Banner and category domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{BannerId, CategoryId};

/// A promotional banner with a validity window.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Banner {
    /// Unique banner id.
    pub id: BannerId,
    /// Unique banner name.
    pub name: String,
    /// Unique image location.
    pub image_path: String,
    /// Target event URL.
    pub event: String,
    /// Start of the validity window.
    pub start_at: DateTime<Utc>,
    /// End of the validity window.
    pub end_at: DateTime<Utc>,
}

/// A product category tree node.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category id.
    pub id: CategoryId,
    /// Parent node, `0` for roots.
    pub parent_id: CategoryId,
    /// Display name.
    pub name: String,
    /// `1` on sale, `2` abandoned.
    pub status: u8,
    /// When the category was created.
    pub created_at: DateTime<Utc>,
}
