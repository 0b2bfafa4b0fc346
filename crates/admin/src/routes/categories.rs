//! Category route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use storekeep_core::{CategoryId, CategoryStatus};

use crate::db::CategoryRepository;
use crate::error::AppError;
use crate::models::Category;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/v1/category/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub parent_id: CategoryId,
    pub name: String,
}

/// Reply to a successful category creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: CategoryId,
}

/// Body of `POST /api/v1/category/status`.
#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub id: CategoryId,
    pub status: CategoryStatus,
}

/// Body of `POST /api/v1/category/name`.
#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub id: CategoryId,
    pub name: String,
}

/// Body of `POST /api/v1/category/children`.
#[derive(Debug, Deserialize)]
pub struct ChildrenRequest {
    pub parent_id: CategoryId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Insert a category under a parent.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let id = CategoryRepository::new(state.pool())
        .create(req.parent_id, &req.name)
        .await?;

    tracing::info!(%id, parent_id = %req.parent_id, "category created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Change a category's lifecycle status.
pub async fn set_status(
    State(state): State<AppState>,
    Json(req): Json<StatusRequest>,
) -> Result<StatusCode, AppError> {
    CategoryRepository::new(state.pool())
        .set_status(req.id, req.status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Rename a category.
pub async fn rename(
    State(state): State<AppState>,
    Json(req): Json<RenameRequest>,
) -> Result<StatusCode, AppError> {
    CategoryRepository::new(state.pool())
        .rename(req.id, &req.name)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the direct children of a parent category.
pub async fn children(
    State(state): State<AppState>,
    Json(req): Json<ChildrenRequest>,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = CategoryRepository::new(state.pool())
        .children(req.parent_id)
        .await?;
    Ok(Json(categories))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_request_rejects_unknown_status() {
        assert!(serde_json::from_str::<StatusRequest>(r#"{"id":1,"status":3}"#).is_err());
        let req: StatusRequest = serde_json::from_str(r#"{"id":1,"status":2}"#).unwrap();
        assert_eq!(req.status, CategoryStatus::Abandoned);
    }
}
