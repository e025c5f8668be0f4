pub mod analytics;
pub mod content;
pub mod media;
pub mod role;
pub mod user;
