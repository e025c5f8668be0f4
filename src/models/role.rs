use serde::{Deserialize, Serialize};

use crate::domain::{ParseEnumError, Role};
use crate::entities::user_roles;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    pub id: String,
    pub user_id: String,
    pub role: Role,
    pub created_at: String,
}

impl TryFrom<user_roles::Model> for RoleAssignment {
    type Error = ParseEnumError;

    fn try_from(model: user_roles::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: model.role.parse()?,
            id: model.id,
            user_id: model.user_id,
            created_at: model.created_at,
        })
    }
}

/// Result of granting a role. A repeated grant is informational, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "assignment", rename_all = "snake_case")]
pub enum GrantOutcome {
    Granted(RoleAssignment),
    AlreadyGranted,
}
