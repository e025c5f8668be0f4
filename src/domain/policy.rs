//! Access policy: pure predicates from a role set to permitted actions.
//!
//! Nothing here touches the store. Callers load the role set for the acting
//! user on every request and evaluate these functions against it.

use serde::Serialize;

use super::{Role, RoleSet};

#[must_use]
pub fn is_admin(roles: &RoleSet) -> bool {
    roles.contains(Role::Admin)
}

/// Admins and moderators see the admin panel.
#[must_use]
pub fn has_admin_access(roles: &RoleSet) -> bool {
    is_admin(roles) || roles.contains(Role::Moderator)
}

#[must_use]
pub fn can_manage_content(roles: &RoleSet) -> bool {
    has_admin_access(roles)
}

/// Moderators manage content but never user roles.
#[must_use]
pub fn can_manage_roles(roles: &RoleSet) -> bool {
    is_admin(roles)
}

#[must_use]
pub fn can_view_analytics(roles: &RoleSet) -> bool {
    has_admin_access(roles)
}

/// Evaluated policy flags, handed to clients to decide what to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Permissions {
    pub admin_panel: bool,
    pub manage_content: bool,
    pub manage_roles: bool,
    pub view_analytics: bool,
}

impl Permissions {
    #[must_use]
    pub fn for_roles(roles: &RoleSet) -> Self {
        Self {
            admin_panel: has_admin_access(roles),
            manage_content: can_manage_content(roles),
            manage_roles: can_manage_roles(roles),
            view_analytics: can_view_analytics(roles),
        }
    }
}
