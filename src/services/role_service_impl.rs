//! `SeaORM` implementation of the `RoleService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::domain::{Actor, Role, RoleSet, can_manage_roles, is_admin, non_blank};
use crate::models::{GrantOutcome, RoleAssignment};
use crate::services::role_service::{RoleError, RoleService, UserWithRoles};

pub struct SeaOrmRoleService {
    store: Store,
}

impl SeaOrmRoleService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

fn require_admin(actor: &Actor, message: &str) -> Result<(), RoleError> {
    if can_manage_roles(&actor.roles) {
        Ok(())
    } else {
        Err(RoleError::Unauthorized(message.to_string()))
    }
}

#[async_trait]
impl RoleService for SeaOrmRoleService {
    async fn grant_role(
        &self,
        actor: &Actor,
        user_id: &str,
        role: &str,
    ) -> Result<GrantOutcome, RoleError> {
        require_admin(actor, "You must be an admin to update user roles")?;

        let (Some(user_id), Some(role)) = (non_blank(Some(user_id)), non_blank(Some(role))) else {
            return Err(RoleError::Validation(
                "User ID and role are required".to_string(),
            ));
        };
        let role: Role = role
            .parse()
            .map_err(|e: crate::domain::ParseEnumError| RoleError::Validation(e.to_string()))?;

        if self.store.get_user_by_id(user_id).await?.is_none() {
            return Err(RoleError::NotFound(format!("User not found: {user_id}")));
        }

        let outcome = self.store.role_repo().grant(user_id, role).await?;
        match &outcome {
            GrantOutcome::Granted(assignment) => info!(
                user_id,
                role = %role,
                assignment_id = %assignment.id,
                granted_by = %actor.user_id,
                "Role granted"
            ),
            GrantOutcome::AlreadyGranted => info!(user_id, role = %role, "Role already granted"),
        }
        Ok(outcome)
    }

    async fn revoke_role(&self, actor: &Actor, assignment_id: &str) -> Result<(), RoleError> {
        require_admin(actor, "You must be an admin to remove user roles")?;

        if self.store.role_repo().revoke(assignment_id).await? {
            info!(assignment_id, revoked_by = %actor.user_id, "Role revoked");
            Ok(())
        } else {
            Err(RoleError::NotFound(format!(
                "Role assignment not found: {assignment_id}"
            )))
        }
    }

    async fn list_users(&self, actor: &Actor) -> Result<Vec<UserWithRoles>, RoleError> {
        require_admin(actor, "You must be an admin to view users")?;

        let users = self.store.user_repo().list_all().await?;
        let assignments = self.store.role_repo().list_all().await?;

        Ok(users
            .into_iter()
            .map(|user| {
                let roles: RoleSet = assignments
                    .iter()
                    .filter(|a| a.user_id == user.id)
                    .map(|a| a.role)
                    .collect();
                UserWithRoles { user, roles }
            })
            .collect())
    }

    async fn list_assignments(&self, actor: &Actor) -> Result<Vec<RoleAssignment>, RoleError> {
        require_admin(actor, "You must be an admin to view user roles")?;
        Ok(self.store.role_repo().list_all().await?)
    }

    async fn bootstrap_admin(&self, actor: &Actor) -> Result<GrantOutcome, RoleError> {
        if is_admin(&actor.roles) {
            return Ok(GrantOutcome::AlreadyGranted);
        }

        let roles = self.store.role_repo();
        if roles.admin_exists().await? {
            return Err(RoleError::Unauthorized(
                "An admin already exists; ask them to grant you a role".to_string(),
            ));
        }

        let outcome = roles.grant(&actor.user_id, Role::Admin).await?;
        info!(user_id = %actor.user_id, "Bootstrapped first admin");
        Ok(outcome)
    }

    async fn roles_for(&self, user_id: &str) -> Result<RoleSet, RoleError> {
        Ok(self.store.role_repo().list_roles(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::hash_password;
    use crate::db::test_store;

    async fn user(store: &Store, email: &str) -> String {
        let hash = hash_password("secret-pass", None).unwrap();
        store
            .user_repo()
            .create(email, None, hash)
            .await
            .unwrap()
            .unwrap()
            .id
    }

    async fn actor(service: &SeaOrmRoleService, user_id: &str) -> Actor {
        Actor::new(user_id, service.roles_for(user_id).await.unwrap())
    }

    #[tokio::test]
    async fn bootstrap_then_grant_then_revoke() {
        let store = test_store().await;
        let service = SeaOrmRoleService::new(store.clone());
        let first = user(&store, "first@example.com").await;
        let second = user(&store, "second@example.com").await;

        let outcome = service
            .bootstrap_admin(&actor(&service, &first).await)
            .await
            .unwrap();
        assert!(matches!(outcome, GrantOutcome::Granted(_)));

        let err = service
            .bootstrap_admin(&actor(&service, &second).await)
            .await
            .unwrap_err();
        assert!(matches!(err, RoleError::Unauthorized(_)));

        let admin = actor(&service, &first).await;
        assert!(is_admin(&admin.roles));

        let GrantOutcome::Granted(assignment) = service
            .grant_role(&admin, &second, "moderator")
            .await
            .unwrap()
        else {
            panic!("expected a new assignment");
        };
        assert_eq!(
            service.grant_role(&admin, &second, "moderator").await.unwrap(),
            GrantOutcome::AlreadyGranted
        );

        let users = service.list_users(&admin).await.unwrap();
        let listed = users.iter().find(|u| u.user.id == second).unwrap();
        assert!(listed.roles.contains(Role::Moderator));

        service.revoke_role(&admin, &assignment.id).await.unwrap();
        assert!(service.roles_for(&second).await.unwrap().is_empty());
        assert!(matches!(
            service.revoke_role(&admin, &assignment.id).await,
            Err(RoleError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn non_admins_cannot_manage_roles() {
        let store = test_store().await;
        let service = SeaOrmRoleService::new(store.clone());
        let id = user(&store, "mod@example.com").await;
        let moderator = Actor::new(&id, [Role::Moderator].into_iter().collect());

        match service.grant_role(&moderator, &id, "admin").await {
            Err(RoleError::Unauthorized(msg)) => {
                assert_eq!(msg, "You must be an admin to update user roles");
            }
            other => panic!("unexpected: {other:?}"),
        }
        match service.revoke_role(&moderator, "any").await {
            Err(RoleError::Unauthorized(msg)) => {
                assert_eq!(msg, "You must be an admin to remove user roles");
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(service.list_assignments(&moderator).await.is_err());
        assert!(service.roles_for(&id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn grant_validates_role_and_user() {
        let store = test_store().await;
        let service = SeaOrmRoleService::new(store.clone());
        let id = user(&store, "boss@example.com").await;
        let admin = Actor::new(&id, [Role::Admin].into_iter().collect());

        assert!(matches!(
            service.grant_role(&admin, &id, "superuser").await,
            Err(RoleError::Validation(_))
        ));
        assert!(matches!(
            service.grant_role(&admin, "", "admin").await,
            Err(RoleError::Validation(_))
        ));
        assert!(matches!(
            service.grant_role(&admin, "nobody", "admin").await,
            Err(RoleError::NotFound(_))
        ));
    }
}
