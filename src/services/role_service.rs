//! Domain service for role management. Every operation except the
//! first-admin bootstrap requires the admin role.

use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::domain::{Actor, RoleSet};
use crate::models::{GrantOutcome, RoleAssignment};

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for RoleError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for RoleError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// A user together with the roles they currently hold.
#[derive(Debug, Clone, Serialize)]
pub struct UserWithRoles {
    #[serde(flatten)]
    pub user: User,
    pub roles: RoleSet,
}

#[async_trait::async_trait]
pub trait RoleService: Send + Sync {
    /// Grants `role` to `user_id`. Granting a role the user already holds
    /// returns [`GrantOutcome::AlreadyGranted`].
    ///
    /// # Errors
    ///
    /// [`RoleError::Unauthorized`] unless the actor is an admin,
    /// [`RoleError::Validation`] for blank input or an unknown role,
    /// [`RoleError::NotFound`] for an unknown user.
    async fn grant_role(
        &self,
        actor: &Actor,
        user_id: &str,
        role: &str,
    ) -> Result<GrantOutcome, RoleError>;

    /// Removes one assignment by id.
    async fn revoke_role(&self, actor: &Actor, assignment_id: &str) -> Result<(), RoleError>;

    async fn list_users(&self, actor: &Actor) -> Result<Vec<UserWithRoles>, RoleError>;

    async fn list_assignments(&self, actor: &Actor) -> Result<Vec<RoleAssignment>, RoleError>;

    /// Makes the actor an admin, but only while the system has no admin.
    async fn bootstrap_admin(&self, actor: &Actor) -> Result<GrantOutcome, RoleError>;

    /// Roles held by a user right now.
    async fn roles_for(&self, user_id: &str) -> Result<RoleSet, RoleError>;
}
