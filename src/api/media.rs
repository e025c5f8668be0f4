use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::domain::Actor;
use crate::models::Media;
use crate::services::{MediaUpload, ensure_can_upload};
use crate::storage::{ProgressFn, UploadProgress};

/// GET /content/{id}/media
pub async fn list_media(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Vec<Media>>>, ApiError> {
    let media = state.media_service().list_media(&actor, &id).await?;
    Ok(Json(ApiResponse::success(media)))
}

/// POST /content/{id}/media
/// Multipart form: `file` (required), `title`, `altText`
pub async fn upload_media(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<ApiResponse<Media>>, ApiError> {
    ensure_can_upload(&actor)?;

    let mut upload = MediaUpload::default();
    let mut has_file = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().unwrap_or("upload").to_string();
                upload.content_type = field.content_type().map(str::to_string);
                upload.bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?
                    .to_vec();
                has_file = true;
            }
            Some("title") => upload.title = Some(read_text(field).await?),
            Some("altText" | "alt_text") => upload.alt_text = Some(read_text(field).await?),
            _ => {}
        }
    }

    if !has_file {
        return Err(ApiError::validation("File is required"));
    }

    let content_id = id.clone();
    let report: ProgressFn<'_> = &move |p: UploadProgress| {
        tracing::debug!(
            content_id = %content_id,
            written = p.written,
            total = p.total,
            percent = p.percent(),
            "Upload progress"
        );
    };

    let media = state
        .media_service()
        .upload(&actor, &id, upload, Some(report))
        .await?;

    Ok(Json(ApiResponse::with_message(
        media,
        "Media uploaded successfully",
    )))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::validation(format!("Invalid form field: {e}")))
}
