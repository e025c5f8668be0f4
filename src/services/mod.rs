pub mod analytics_service;
pub mod analytics_service_impl;
pub use analytics_service::{AnalyticsError, AnalyticsService};
pub use analytics_service_impl::SeaOrmAnalyticsService;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod content_service;
pub mod content_service_impl;
pub use content_service::{ContentError, ContentInput, ContentService};
pub use content_service_impl::SeaOrmContentService;

pub mod media_service;
pub mod media_service_impl;
pub use media_service::{MediaError, MediaService, MediaUpload};
pub use media_service_impl::{DefaultMediaService, ensure_can_upload};

pub mod role_service;
pub mod role_service_impl;
pub use role_service::{RoleError, RoleService, UserWithRoles};
pub use role_service_impl::SeaOrmRoleService;
