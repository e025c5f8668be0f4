use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{AnalyticsError, AuthError, ContentError, MediaError, RoleError};
use crate::storage::StorageError;

#[derive(Debug)]
pub enum ApiError {
    ValidationError(String),

    /// No valid session.
    Unauthorized(String),

    /// Authenticated, but the role set does not permit the action.
    Forbidden(String),

    NotFound(String),

    Conflict(String),

    /// The relational or object store rejected the operation. The message is
    /// returned to the client as-is.
    StoreError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::StoreError(msg) => write!(f, "Store error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::StoreError(msg) => {
                tracing::warn!("Store error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<ContentError> for ApiError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Validation(msg) => ApiError::ValidationError(msg),
            ContentError::Unauthorized(msg) => ApiError::Forbidden(msg),
            ContentError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ContentError::Store(msg) => ApiError::StoreError(msg),
        }
    }
}

impl From<RoleError> for ApiError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::Validation(msg) => ApiError::ValidationError(msg),
            RoleError::Unauthorized(msg) => ApiError::Forbidden(msg),
            RoleError::NotFound(msg) => ApiError::NotFound(msg),
            RoleError::Store(msg) => ApiError::StoreError(msg),
        }
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        match err {
            AnalyticsError::Unauthorized(msg) => ApiError::Forbidden(msg),
            AnalyticsError::NotFound(_) => ApiError::NotFound(err.to_string()),
            AnalyticsError::Store(msg) => ApiError::StoreError(msg),
        }
    }
}

impl From<MediaError> for ApiError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::Validation(msg) => ApiError::ValidationError(msg),
            MediaError::Unauthorized(msg) => ApiError::Forbidden(msg),
            MediaError::NotFound(_) => ApiError::NotFound(err.to_string()),
            MediaError::Storage(StorageError::AlreadyExists) => {
                ApiError::Conflict(StorageError::AlreadyExists.to_string())
            }
            MediaError::Storage(StorageError::InvalidPath(path)) => {
                ApiError::ValidationError(format!("Invalid object path: {path}"))
            }
            MediaError::Storage(e) => ApiError::StoreError(e.to_string()),
            MediaError::Store(msg) => ApiError::StoreError(msg),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidResetLink => {
                ApiError::ValidationError(err.to_string())
            }
            AuthError::AlreadyRegistered => ApiError::Conflict(err.to_string()),
            AuthError::UserNotFound => ApiError::Unauthorized(err.to_string()),
            AuthError::Validation(msg) => ApiError::ValidationError(msg),
            AuthError::Store(msg) => ApiError::StoreError(msg),
            AuthError::Internal(msg) => ApiError::InternalError(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }

    pub fn unauthenticated() -> Self {
        ApiError::Unauthorized("Not authenticated".to_string())
    }
}
