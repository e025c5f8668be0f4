use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, GrantRoleRequest};
use crate::domain::Actor;
use crate::models::{GrantOutcome, RoleAssignment};
use crate::services::UserWithRoles;

/// GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<UserWithRoles>>>, ApiError> {
    let users = state.role_service().list_users(&actor).await?;
    Ok(Json(ApiResponse::success(users)))
}

/// GET /roles
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<Vec<RoleAssignment>>>, ApiError> {
    let assignments = state.role_service().list_assignments(&actor).await?;
    Ok(Json(ApiResponse::success(assignments)))
}

/// POST /roles
pub async fn grant_role(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<GrantRoleRequest>,
) -> Result<Json<ApiResponse<GrantOutcome>>, ApiError> {
    let outcome = state
        .role_service()
        .grant_role(&actor, &payload.user_id, &payload.role)
        .await?;

    Ok(Json(grant_response(outcome)))
}

/// DELETE /roles/{id}
pub async fn revoke_role(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.role_service().revoke_role(&actor, &id).await?;
    Ok(Json(ApiResponse::message("Role removed successfully")))
}

/// POST /roles/bootstrap
/// Claims the admin role while the system has none
pub async fn bootstrap_admin(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<GrantOutcome>>, ApiError> {
    let outcome = state.role_service().bootstrap_admin(&actor).await?;
    Ok(Json(grant_response(outcome)))
}

fn grant_response(outcome: GrantOutcome) -> ApiResponse<GrantOutcome> {
    let message = match outcome {
        GrantOutcome::Granted(_) => "Role added successfully",
        GrantOutcome::AlreadyGranted => "User already has this role",
    };
    ApiResponse::with_message(outcome, message)
}
