//! Banner route handlers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storekeep_core::BannerId;

use crate::db::BannerRepository;
use crate::error::AppError;
use crate::models::Banner;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Body of `POST /api/v1/banner/create`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub name: String,
    pub image_path: String,
    pub event: String,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Reply to a successful banner creation.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: BannerId,
}

/// Body of `POST /api/v1/banner/list`.
#[derive(Debug, Deserialize)]
pub struct ListRequest {
    /// Unix time the banners must be valid at.
    pub at: i64,
}

/// Body of `POST /api/v1/banner/info` and `POST /api/v1/banner/delete`.
#[derive(Debug, Deserialize)]
pub struct IdRequest {
    pub id: BannerId,
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a banner.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    if req.end_at < req.start_at {
        return Err(AppError::BadRequest(
            "banner window ends before it starts".to_owned(),
        ));
    }

    let id = BannerRepository::new(state.pool())
        .create(
            &req.name,
            &req.image_path,
            &req.event,
            req.start_at,
            req.end_at,
        )
        .await?;

    tracing::info!(%id, name = %req.name, "banner created");
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// List banners valid at a unix time.
pub async fn list_valid(
    State(state): State<AppState>,
    Json(req): Json<ListRequest>,
) -> Result<Json<Vec<Banner>>, AppError> {
    let at = DateTime::<Utc>::from_timestamp(req.at, 0)
        .ok_or_else(|| AppError::BadRequest("timestamp out of range".to_owned()))?;

    let banners = BannerRepository::new(state.pool()).list_valid_at(at).await?;
    Ok(Json(banners))
}

/// Fetch a banner by id.
pub async fn info(
    State(state): State<AppState>,
    Json(req): Json<IdRequest>,
) -> Result<Json<Banner>, AppError> {
    let banner = BannerRepository::new(state.pool()).get(req.id).await?;
    Ok(Json(banner))
}

/// Delete a banner by id.
pub async fn delete(
    State(state): State<AppState>,
    Json(req): Json<IdRequest>,
) -> Result<StatusCode, AppError> {
    BannerRepository::new(state.pool()).delete(req.id).await?;

    tracing::info!(id = %req.id, "banner deleted");
    Ok(StatusCode::NO_CONTENT)
}
