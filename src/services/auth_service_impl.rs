//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tokio::task;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::repositories::user::hash_password;
use crate::db::{Store, User};
use crate::domain::non_blank;
use crate::services::auth_service::{AuthError, AuthService};

/// Log target that stands in for the outbound mailer.
pub const MAIL_TARGET: &str = "contenthub::mail";

const DEFAULT_RESET_REDIRECT: &str = "/reset-password";

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig) -> Self {
        Self { store, security }
    }

    fn check_length(&self, password: &str) -> Result<(), AuthError> {
        if password.chars().count() < self.security.min_password_length {
            return Err(AuthError::Validation(format!(
                "Password should be at least {} characters",
                self.security.min_password_length
            )));
        }
        Ok(())
    }

    async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let password = password.to_string();
        let config = self.security.clone();
        task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| AuthError::Internal(format!("Password hashing task panicked: {e}")))?
            .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

fn reset_link(site_url: &str, token: &str, redirect_to: &str) -> Result<String, AuthError> {
    let mut link = url::Url::parse(site_url)
        .and_then(|base| base.join("/api/auth/callback"))
        .map_err(|e| AuthError::Internal(format!("Invalid site_url: {e}")))?;
    link.query_pairs_mut()
        .append_pair("token", token)
        .append_pair("redirect_to", redirect_to);
    Ok(link.into())
}

fn normalize_email(email: &str) -> Option<String> {
    non_blank(Some(email)).map(str::to_lowercase)
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> Result<User, AuthError> {
        let (Some(email), false) = (normalize_email(email), password.is_empty()) else {
            return Err(AuthError::Validation(
                "Email and password are required".to_string(),
            ));
        };
        self.check_length(password)?;

        let hash = self.hash(password).await?;
        let user = self
            .store
            .user_repo()
            .create(&email, non_blank(full_name), hash)
            .await?
            .ok_or(AuthError::AlreadyRegistered)?;

        info!(user_id = %user.id, "User signed up");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(email) = normalize_email(email) else {
            return Err(AuthError::InvalidCredentials);
        };

        let user = self
            .store
            .user_repo()
            .verify_password(&email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!(user_id = %user.id, "User signed in");
        Ok(user)
    }

    async fn request_password_reset(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let Some(email) = normalize_email(email) else {
            return Err(AuthError::Validation("Email is required".to_string()));
        };

        let Some(user) = self.store.get_user_by_email(&email).await? else {
            warn!("Password reset requested for unknown email");
            return Ok(());
        };

        let repo = self.store.user_repo();
        let token = repo
            .create_reset_token(&user.id, self.security.reset_token_ttl_minutes)
            .await?;
        let redirect = non_blank(redirect_to).unwrap_or(DEFAULT_RESET_REDIRECT);
        let link = reset_link(&self.security.site_url, &token, redirect)?;

        info!(target: MAIL_TARGET, to = %user.email, %link, "Password reset link");
        Ok(())
    }

    async fn redeem_reset_token(&self, token: &str) -> Result<User, AuthError> {
        let Some(token) = non_blank(Some(token)) else {
            return Err(AuthError::InvalidResetLink);
        };

        let user_id = self
            .store
            .user_repo()
            .redeem_reset_token(token)
            .await?
            .ok_or(AuthError::InvalidResetLink)?;

        self.get_user(&user_id).await
    }

    async fn update_password(
        &self,
        user_id: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<(), AuthError> {
        if password.is_empty() || confirm_password.is_empty() {
            return Err(AuthError::Validation(
                "Password and confirm password are required".to_string(),
            ));
        }
        if password != confirm_password {
            return Err(AuthError::Validation("Passwords do not match".to_string()));
        }
        self.check_length(password)?;

        if self.store.get_user_by_id(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        self.store
            .user_repo()
            .update_password(user_id, password, &self.security)
            .await?;

        info!(user_id, "Password updated");
        Ok(())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_store;

    async fn service() -> SeaOrmAuthService {
        SeaOrmAuthService::new(test_store().await, SecurityConfig::default())
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = service().await;
        let user = auth
            .sign_up(" Reader@Example.com ", "hunter22", Some("Sok Dara"))
            .await
            .unwrap();
        assert_eq!(user.email, "reader@example.com");
        assert_eq!(user.display_name(), "Sok Dara");

        let signed_in = auth.sign_in("reader@example.com", "hunter22").await.unwrap();
        assert_eq!(signed_in.id, user.id);

        let err = auth.sign_in("reader@example.com", "wrong").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid login credentials");
        let err = auth.sign_in("ghost@example.com", "hunter22").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn sign_up_validation() {
        let auth = service().await;
        let err = auth.sign_up("", "hunter22", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
        let err = auth.sign_up("a@example.com", "", None).await.unwrap_err();
        assert_eq!(err.to_string(), "Email and password are required");
        let err = auth.sign_up("a@example.com", "12345", None).await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        auth.sign_up("a@example.com", "123456", None).await.unwrap();
        let err = auth.sign_up("A@example.com", "123456", None).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered));
    }

    #[tokio::test]
    async fn reset_flow_uses_single_use_token() {
        let auth = service().await;
        let user = auth.sign_up("forgetful@example.com", "hunter22", None).await.unwrap();

        assert!(matches!(
            auth.request_password_reset("  ", None).await,
            Err(AuthError::Validation(ref m)) if m == "Email is required"
        ));
        auth.request_password_reset("nobody@example.com", None).await.unwrap();
        auth.request_password_reset("forgetful@example.com", None).await.unwrap();

        let token = auth
            .store
            .user_repo()
            .create_reset_token(&user.id, 5)
            .await
            .unwrap();
        let redeemed = auth.redeem_reset_token(&token).await.unwrap();
        assert_eq!(redeemed.id, user.id);
        assert!(matches!(
            auth.redeem_reset_token(&token).await,
            Err(AuthError::InvalidResetLink)
        ));
    }

    #[tokio::test]
    async fn update_password_checks_confirmation() {
        let auth = service().await;
        let user = auth.sign_up("changer@example.com", "hunter22", None).await.unwrap();

        let err = auth.update_password(&user.id, "", "").await.unwrap_err();
        assert_eq!(err.to_string(), "Password and confirm password are required");
        let err = auth
            .update_password(&user.id, "newpass1", "newpass2")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");

        auth.update_password(&user.id, "newpass1", "newpass1").await.unwrap();
        assert!(auth.sign_in("changer@example.com", "hunter22").await.is_err());
        assert!(auth.sign_in("changer@example.com", "newpass1").await.is_ok());
    }

    #[test]
    fn reset_link_points_at_callback() {
        let link = reset_link("http://localhost:3000", "abc", "/reset-password").unwrap();
        assert_eq!(
            link,
            "http://localhost:3000/api/auth/callback?token=abc&redirect_to=%2Freset-password"
        );
    }
}
