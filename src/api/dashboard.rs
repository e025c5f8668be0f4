use axum::{Extension, Json, extract::State};
use std::sync::Arc;

use super::auth::current_user;
use super::{ApiError, ApiResponse, AppState, DashboardDto};
use crate::db::repositories::content::ContentFilter;
use crate::domain::{Actor, has_admin_access};

const RECENT_CONTENT: u64 = 10;

/// GET /dashboard
/// Signed-in user, their permission flags, and recent content for admins
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let user = current_user(&state, &actor).await?;

    let recent_content = if has_admin_access(&actor.roles) {
        let filter = ContentFilter {
            limit: Some(RECENT_CONTENT),
            ..ContentFilter::default()
        };
        state.content_service().list_content(&actor, filter).await?
    } else {
        Vec::new()
    };

    Ok(Json(ApiResponse::success(DashboardDto {
        user,
        recent_content,
    })))
}
