use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use std::sync::Arc;

use super::validation::parse_filter;
use super::{ApiError, ApiResponse, AppState, ContentListQuery};
use crate::db::repositories::content::ContentFilter;
use crate::domain::Actor;
use crate::models::{Content, ContentAnalytics};
use crate::services::ContentInput;

/// GET /content?status=..&language=..
pub async fn list_content(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<ApiResponse<Vec<Content>>>, ApiError> {
    let filter = ContentFilter {
        status: parse_filter(query.status.as_deref())?,
        language: parse_filter(query.language.as_deref())?,
        limit: None,
    };

    let content = state.content_service().list_content(&actor, filter).await?;
    Ok(Json(ApiResponse::success(content)))
}

/// POST /content
pub async fn create_content(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ContentInput>,
) -> Result<Json<ApiResponse<Content>>, ApiError> {
    let content = state
        .content_service()
        .create_content(&actor, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        content,
        "Content created successfully",
    )))
}

/// GET /content/{id}
pub async fn get_content(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Content>>, ApiError> {
    let content = state.content_service().get_content(&actor, &id).await?;
    Ok(Json(ApiResponse::success(content)))
}

/// PUT /content/{id}
pub async fn update_content(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    Json(payload): Json<ContentInput>,
) -> Result<Json<ApiResponse<Content>>, ApiError> {
    let content = state
        .content_service()
        .update_content(&actor, &id, payload)
        .await?;

    Ok(Json(ApiResponse::with_message(
        content,
        "Content updated successfully",
    )))
}

/// DELETE /content/{id}
pub async fn delete_content(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.content_service().delete_content(&actor, &id).await?;
    Ok(Json(ApiResponse::message("Content deleted successfully")))
}

/// GET /content/{id}/analytics
/// Creates the zeroed row on first view
pub async fn get_analytics(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ContentAnalytics>>, ApiError> {
    let analytics = state.analytics_service().view(&actor, &id).await?;
    Ok(Json(ApiResponse::success(analytics)))
}
