pub mod prelude;

pub mod content;
pub mod content_analytics;
pub mod media;
pub mod password_resets;
pub mod user_roles;
pub mod users;
