use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use crate::domain::{MediaType, now_timestamp};
use crate::entities::media;
use crate::models::Media;

/// Row values for a freshly uploaded object.
#[derive(Debug, Clone)]
pub struct NewMedia {
    pub content_id: String,
    pub url: String,
    pub storage_path: String,
    pub media_type: MediaType,
    pub title: Option<String>,
    pub alt_text: Option<String>,
}

pub struct MediaRepository {
    conn: DatabaseConnection,
}

impl MediaRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, new: NewMedia) -> Result<Media> {
        let now = now_timestamp();
        let active = media::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            content_id: Set(new.content_id),
            url: Set(new.url),
            storage_path: Set(new.storage_path),
            media_type: Set(new.media_type.as_str().to_string()),
            title: Set(new.title),
            alt_text: Set(new.alt_text),
            width: Set(None),
            height: Set(None),
            duration: Set(None),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert media")?;

        Ok(Media::try_from(model)?)
    }

    pub async fn list_for_content(&self, content_id: &str) -> Result<Vec<Media>> {
        let rows = media::Entity::find()
            .filter(media::Column::ContentId.eq(content_id))
            .order_by_asc(media::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("Failed to list media")?;

        rows.into_iter()
            .map(|row| Media::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Object store keys for every media row of a content record.
    pub async fn storage_paths_for_content(&self, content_id: &str) -> Result<Vec<String>> {
        media::Entity::find()
            .select_only()
            .column(media::Column::StoragePath)
            .filter(media::Column::ContentId.eq(content_id))
            .into_tuple::<String>()
            .all(&self.conn)
            .await
            .context("Failed to list media storage paths")
    }
}
