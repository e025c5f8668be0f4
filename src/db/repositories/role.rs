use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::is_unique_violation;
use crate::domain::{Role, RoleSet, now_timestamp};
use crate::entities::user_roles;
use crate::models::{GrantOutcome, RoleAssignment};

pub struct RoleRepository {
    conn: DatabaseConnection,
}

impl RoleRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn has_role(&self, user_id: &str, role: Role) -> Result<bool> {
        let count = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(user_roles::Column::Role.eq(role.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to check user role")?;

        Ok(count > 0)
    }

    /// Roles currently held by the user. Unknown stored values are skipped
    /// with a warning so a bad row cannot lock an admin out.
    pub async fn list_roles(&self, user_id: &str) -> Result<RoleSet> {
        let rows = user_roles::Entity::find()
            .filter(user_roles::Column::UserId.eq(user_id))
            .all(&self.conn)
            .await
            .context("Failed to list user roles")?;

        Ok(rows
            .into_iter()
            .filter_map(|row| match row.role.parse::<Role>() {
                Ok(role) => Some(role),
                Err(e) => {
                    tracing::warn!(user_id, error = %e, "Ignoring unknown stored role");
                    None
                }
            })
            .collect())
    }

    pub async fn grant(&self, user_id: &str, role: Role) -> Result<GrantOutcome> {
        let now = now_timestamp();
        let active = user_roles::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            user_id: Set(user_id.to_string()),
            role: Set(role.as_str().to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(GrantOutcome::Granted(RoleAssignment::try_from(model)?)),
            Err(e) if is_unique_violation(&e) => Ok(GrantOutcome::AlreadyGranted),
            Err(e) => Err(e).context("Failed to grant role"),
        }
    }

    /// Deletes one assignment by id. Returns false when no such row existed.
    pub async fn revoke(&self, assignment_id: &str) -> Result<bool> {
        let result = user_roles::Entity::delete_by_id(assignment_id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to revoke role")?;

        Ok(result.rows_affected > 0)
    }

    /// Every assignment, oldest first. Rows with unknown role values are
    /// skipped the same way `list_roles` skips them.
    pub async fn list_all(&self) -> Result<Vec<RoleAssignment>> {
        let rows = user_roles::Entity::find()
            .order_by_asc(user_roles::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list role assignments")?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let assignment_id = row.id.clone();
                match RoleAssignment::try_from(row) {
                    Ok(assignment) => Some(assignment),
                    Err(e) => {
                        tracing::warn!(assignment_id, error = %e, "Ignoring unknown stored role");
                        None
                    }
                }
            })
            .collect())
    }

    pub async fn admin_exists(&self) -> Result<bool> {
        let count = user_roles::Entity::find()
            .filter(user_roles::Column::Role.eq(Role::Admin.as_str()))
            .count(&self.conn)
            .await
            .context("Failed to count admins")?;

        Ok(count > 0)
    }
}
