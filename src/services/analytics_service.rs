//! Lazily created engagement counters, one row per content record.

use thiserror::Error;

use crate::domain::Actor;
use crate::models::ContentAnalytics;

#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for AnalyticsError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for AnalyticsError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

#[async_trait::async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Returns the analytics row for a content record, creating a zeroed one
    /// on first access. Never changes counters.
    ///
    /// # Errors
    ///
    /// [`AnalyticsError::NotFound`] when the content does not exist.
    async fn get_or_create(&self, content_id: &str) -> Result<ContentAnalytics, AnalyticsError>;

    /// [`Self::get_or_create`] gated on `can_view_analytics`.
    async fn view(
        &self,
        actor: &Actor,
        content_id: &str,
    ) -> Result<ContentAnalytics, AnalyticsError>;
}
