//! Domain service for authentication and account recovery.
//!
//! Session state is owned by the HTTP layer; this service only answers who a
//! set of credentials (or a reset link) belongs to.

use thiserror::Error;

use crate::db::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User already registered")]
    AlreadyRegistered,

    #[error("Invalid or expired reset link")]
    InvalidResetLink,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Store(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for missing fields or a short password,
    /// [`AuthError::AlreadyRegistered`] when the email is taken.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<User, AuthError>;

    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Issues a one-time reset link for a known email and hands it to the
    /// mail log target. Unknown emails succeed silently.
    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError>;

    /// Consumes a reset token and returns the user it was issued for.
    async fn redeem_reset_token(&self, token: &str) -> Result<User, AuthError>;

    /// Sets a new password for an authenticated user.
    async fn update_password(
        &self,
        user_id: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError>;

    async fn get_user(&self, user_id: &str) -> Result<User, AuthError>;
}
