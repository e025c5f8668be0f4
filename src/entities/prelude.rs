pub use super::content::Entity as Content;
pub use super::content_analytics::Entity as ContentAnalytics;
pub use super::media::Entity as Media;
pub use super::password_resets::Entity as PasswordResets;
pub use super::user_roles::Entity as UserRoles;
pub use super::users::Entity as Users;
