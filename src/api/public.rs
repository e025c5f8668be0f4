use axum::{
    Json,
    extract::{Query, State},
};
use std::sync::Arc;

use super::validation::{DEFAULT_FEATURED_LIMIT, parse_filter, validate_limit};
use super::{ApiError, ApiResponse, AppState, FeaturedQuery};
use crate::models::Content;

/// GET /public/featured?language=..&limit=..
/// No session required
pub async fn featured_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeaturedQuery>,
) -> Result<Json<ApiResponse<Vec<Content>>>, ApiError> {
    let language = parse_filter(query.language.as_deref())?;
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_FEATURED_LIMIT))?;

    let content = state
        .content_service()
        .list_featured(language, limit)
        .await?;
    Ok(Json(ApiResponse::success(content)))
}
