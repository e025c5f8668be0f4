use serde::{Deserialize, Serialize};

use crate::domain::{ContentStatus, ContentType, Language, ParseEnumError};
use crate::entities::content;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub language: Language,
    pub status: ContentStatus,
    pub featured: bool,
    pub publish_date: Option<String>,
    /// Creating user. Never changes after insert.
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<content::Model> for Content {
    type Error = ParseEnumError;

    fn try_from(model: content::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            content_type: model.content_type.parse()?,
            language: model.language.parse()?,
            status: model.status.parse()?,
            id: model.id,
            title: model.title,
            description: model.description,
            featured: model.featured,
            publish_date: model.publish_date,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

/// Validated field values for an insert or a full update.
///
/// `status` and `featured` are optional so an update can leave them as they
/// are; an insert falls back to draft and not featured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentFields {
    pub title: String,
    pub description: Option<String>,
    pub content_type: ContentType,
    pub language: Language,
    pub status: Option<ContentStatus>,
    pub featured: Option<bool>,
    pub publish_date: Option<String>,
}
