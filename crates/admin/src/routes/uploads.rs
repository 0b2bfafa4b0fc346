//! File upload route handler.

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;

use crate::db::UploadRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::storage::content_hash;
use crate::state::AppState;

/// Multipart field name carrying the file.
const FILE_FIELD: &str = "file";

/// Reply to an upload, whether freshly stored or deduplicated.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub file_path: String,
}

/// Accept a multipart upload and store it by content hash.
///
/// A hash that is already recorded short-circuits to the stored path with
/// 200; new content is written to the store, recorded, and answered with
/// 201.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(admin): RequireAuth,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some(FILE_FIELD) {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.to_string()))?;
            file = Some((file_name, bytes.to_vec()));
            break;
        }
    }

    let Some((file_name, bytes)) = file else {
        return Err(AppError::BadRequest(format!(
            "missing multipart field '{FILE_FIELD}'"
        )));
    };

    let repo = UploadRepository::new(state.pool());
    let hash = content_hash(&bytes);

    // Known content: answer with the recorded path, write nothing.
    if let Some(path) = repo.path_by_hash(&hash).await? {
        return Ok((
            StatusCode::OK,
            Json(UploadResponse {
                file_path: state.store().public_url(&path),
            }),
        ));
    }

    let stored = state.store().save(&file_name, &bytes).await?;
    repo.insert(admin.id, &stored.hash, &stored.relative_path)
        .await?;

    tracing::info!(
        admin_id = %admin.id,
        hash = %stored.hash,
        path = %stored.relative_path,
        "file uploaded"
    );

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            file_path: state.store().public_url(&stored.relative_path),
        }),
    ))
}
