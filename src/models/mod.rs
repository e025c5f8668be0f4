pub mod analytics;
pub mod content;
pub mod media;
pub mod role;

pub use analytics::ContentAnalytics;
pub use content::{Content, ContentFields};
pub use media::Media;
pub use role::{GrantOutcome, RoleAssignment};
