//! Domain service for media uploads attached to content records.

use thiserror::Error;

use crate::domain::Actor;
use crate::models::Media;
use crate::storage::{ProgressFn, StorageError};

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for MediaError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for MediaError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// A file received from a client.
#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub file_name: String,
    /// MIME type declared by the client, if any.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    pub title: Option<String>,
    pub alt_text: Option<String>,
}

#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Stores the file in the object store and records a media row.
    ///
    /// # Errors
    ///
    /// [`MediaError::Unauthorized`] without content management rights,
    /// [`MediaError::NotFound`] for unknown content,
    /// [`MediaError::Validation`] for empty or oversized files.
    async fn upload(
        &self,
        actor: &Actor,
        content_id: &str,
        upload: MediaUpload,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<Media, MediaError>;

    async fn list_media(&self, actor: &Actor, content_id: &str) -> Result<Vec<Media>, MediaError>;
}
