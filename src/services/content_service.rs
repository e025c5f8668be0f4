//! Domain service for the content lifecycle.
//!
//! Create, update and delete are gated on `can_manage_content`; the
//! permission check always runs before input validation.

use serde::Deserialize;
use thiserror::Error;

use crate::db::repositories::content::ContentFilter;
use crate::domain::{Actor, Language};
use crate::models::Content;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("Content not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Store(String),
}

impl From<sea_orm::DbErr> for ContentError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<anyhow::Error> for ContentError {
    fn from(err: anyhow::Error) -> Self {
        Self::Store(format!("{err:#}"))
    }
}

/// Raw content form values as submitted by a client. Field names are
/// camelCase; snake_case aliases are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "content_type")]
    pub content_type: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub featured: Option<bool>,
    #[serde(default, alias = "publish_date")]
    pub publish_date: Option<String>,
}

#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    /// Creates a content record owned by the actor.
    ///
    /// # Errors
    ///
    /// [`ContentError::Unauthorized`] without content management rights,
    /// [`ContentError::Validation`] when a required field is missing or a
    /// value is outside its vocabulary.
    async fn create_content(
        &self,
        actor: &Actor,
        input: ContentInput,
    ) -> Result<Content, ContentError>;

    /// Replaces the editable fields of a record. Status and featured are
    /// kept when omitted.
    async fn update_content(
        &self,
        actor: &Actor,
        content_id: &str,
        input: ContentInput,
    ) -> Result<Content, ContentError>;

    /// Irreversibly deletes a record together with its media and analytics.
    async fn delete_content(&self, actor: &Actor, content_id: &str) -> Result<(), ContentError>;

    async fn get_content(&self, actor: &Actor, content_id: &str) -> Result<Content, ContentError>;

    async fn list_content(
        &self,
        actor: &Actor,
        filter: ContentFilter,
    ) -> Result<Vec<Content>, ContentError>;

    /// Published, featured content for the public site. No actor needed.
    async fn list_featured(
        &self,
        language: Option<Language>,
        limit: u64,
    ) -> Result<Vec<Content>, ContentError>;
}
