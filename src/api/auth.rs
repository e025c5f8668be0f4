use axum::{
    Extension, Json,
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::sync::Arc;
use tower_sessions::Session;

use super::validation::safe_redirect;
use super::{
    ApiError, ApiResponse, AppState, CallbackQuery, CurrentUserDto, ForgotPasswordRequest,
    ResetPasswordRequest, SignInRequest, SignUpRequest,
};
use crate::db::User;
use crate::domain::Actor;
use crate::services::AuthError;

const SESSION_USER_KEY: &str = "user_id";

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the session to an [`Actor`]. Roles are read from the store on
/// every request so grants and revocations apply immediately.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id = get_session_user_id(&session).await?;

    match state.auth_service().get_user(&user_id).await {
        Ok(_) => {}
        Err(AuthError::UserNotFound) => {
            let _ = session.flush().await;
            return Err(ApiError::unauthenticated());
        }
        Err(e) => return Err(e.into()),
    }

    let roles = state.role_service().roles_for(&user_id).await?;
    let actor = Actor::new(user_id, roles);

    request.extensions_mut().insert(actor.clone());
    let mut response = next.run(request).await;
    // Lets the request logger attribute the outcome to the caller
    response.extensions_mut().insert(actor);
    Ok(response)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/sign-up
/// Register and start a session for the new account
pub async fn sign_up(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SignUpRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .auth_service()
        .sign_up(
            &payload.email,
            &payload.password,
            payload.full_name.as_deref(),
        )
        .await?;

    start_session(&session, &user.id).await?;

    Ok(Json(ApiResponse::with_message(
        user,
        "Thanks for signing up!",
    )))
}

/// POST /auth/sign-in
pub async fn sign_in(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SignInRequest>,
) -> Result<Json<ApiResponse<User>>, ApiError> {
    let user = state
        .auth_service()
        .sign_in(&payload.email, &payload.password)
        .await?;

    start_session(&session, &user.id).await?;

    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/forgot-password
/// Always answers with the same message so account existence is not leaked
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .request_password_reset(&payload.email, payload.redirect_to.as_deref())
        .await?;

    Ok(Json(ApiResponse::message(
        "Check your email for a link to reset your password.",
    )))
}

/// GET /auth/callback?token=..&redirect_to=..
/// Redeem a reset link, sign the user in and send them on
pub async fn callback(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Result<Redirect, ApiError> {
    let user = state.auth_service().redeem_reset_token(&query.token).await?;
    start_session(&session, &user.id).await?;

    let target = safe_redirect(query.redirect_to.as_deref(), "/reset-password");
    Ok(Redirect::to(&target))
}

/// POST /auth/sign-out
pub async fn sign_out(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    Json(ApiResponse::message("Signed out"))
}

/// POST /auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
    Json(payload): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .update_password(
            &actor.user_id,
            &payload.password,
            &payload.confirm_password,
        )
        .await?;

    Ok(Json(ApiResponse::message("Password updated")))
}

/// GET /auth/me
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    Extension(actor): Extension<Actor>,
) -> Result<Json<ApiResponse<CurrentUserDto>>, ApiError> {
    Ok(Json(ApiResponse::success(
        current_user(&state, &actor).await?,
    )))
}

// ============================================================================
// Helpers
// ============================================================================

pub(super) async fn current_user(
    state: &AppState,
    actor: &Actor,
) -> Result<CurrentUserDto, ApiError> {
    let user = state.auth_service().get_user(&actor.user_id).await?;
    Ok(CurrentUserDto {
        user,
        permissions: actor.permissions(),
        roles: actor.roles.clone(),
    })
}

async fn start_session(session: &Session, user_id: &str) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;
    session
        .insert(SESSION_USER_KEY, user_id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

/// Get the user id from the session, returns error if not authenticated
async fn get_session_user_id(session: &Session) -> Result<String, ApiError> {
    session
        .get::<String>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(ApiError::unauthenticated)
}
