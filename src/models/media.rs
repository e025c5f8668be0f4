use serde::{Deserialize, Serialize};

use crate::domain::{MediaType, ParseEnumError};
use crate::entities::media;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Media {
    pub id: String,
    pub content_id: String,
    pub url: String,
    #[serde(skip_serializing)]
    pub storage_path: String,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub duration: Option<f64>,
    pub created_at: String,
}

impl TryFrom<media::Model> for Media {
    type Error = ParseEnumError;

    fn try_from(model: media::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            media_type: model.media_type.parse()?,
            id: model.id,
            content_id: model.content_id,
            url: model.url,
            storage_path: model.storage_path,
            title: model.title,
            alt_text: model.alt_text,
            width: model.width,
            height: model.height,
            duration: model.duration,
            created_at: model.created_at,
        })
    }
}
