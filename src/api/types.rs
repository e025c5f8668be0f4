use serde::{Deserialize, Serialize};

use crate::db::User;
use crate::domain::{Permissions, RoleSet};
use crate::models::Content;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(message.into()),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }
}

/// The signed-in user as seen by clients.
#[derive(Debug, Serialize)]
pub struct CurrentUserDto {
    #[serde(flatten)]
    pub user: User,
    pub roles: RoleSet,
    pub permissions: Permissions,
}

/// Landing data for the dashboard page.
#[derive(Debug, Serialize)]
pub struct DashboardDto {
    pub user: CurrentUserDto,
    /// Empty unless the user has admin access.
    pub recent_content: Vec<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "full_name")]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default, alias = "redirect_to")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default, alias = "confirm_password")]
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    #[serde(default)]
    pub token: String,
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantRoleRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub struct ContentListQuery {
    pub status: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedQuery {
    pub language: Option<String>,
    pub limit: Option<u64>,
}
