mod roles;
mod users;

pub use roles::{cmd_grant_role, cmd_roles};
pub use users::cmd_users;
