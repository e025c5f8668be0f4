use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

use crate::domain::{ContentStatus, Language, now_timestamp};
use crate::entities::content;
use crate::models::{Content, ContentFields};

/// Optional list filters; `None` means "any".
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentFilter {
    pub status: Option<ContentStatus>,
    pub language: Option<Language>,
    /// Caps the number of rows returned; `None` returns every match.
    pub limit: Option<u64>,
}

pub struct ContentRepository {
    conn: DatabaseConnection,
}

impl ContentRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, owner_id: &str, fields: &ContentFields) -> Result<Content> {
        let now = now_timestamp();
        let active = content::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            title: Set(fields.title.clone()),
            description: Set(fields.description.clone()),
            content_type: Set(fields.content_type.as_str().to_string()),
            language: Set(fields.language.as_str().to_string()),
            status: Set(fields.status.unwrap_or_default().as_str().to_string()),
            featured: Set(fields.featured.unwrap_or(false)),
            publish_date: Set(fields.publish_date.clone()),
            user_id: Set(owner_id.to_string()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert content")?;

        Ok(Content::try_from(model)?)
    }

    /// Replaces the editable fields of an existing row. Returns `None` when
    /// the row does not exist.
    pub async fn update(&self, id: &str, fields: &ContentFields) -> Result<Option<Content>> {
        let Some(existing) = content::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query content for update")?
        else {
            return Ok(None);
        };

        let mut active: content::ActiveModel = existing.into();
        active.title = Set(fields.title.clone());
        active.description = Set(fields.description.clone());
        active.content_type = Set(fields.content_type.as_str().to_string());
        active.language = Set(fields.language.as_str().to_string());
        active.publish_date = Set(fields.publish_date.clone());
        if let Some(status) = fields.status {
            active.status = Set(status.as_str().to_string());
        }
        if let Some(featured) = fields.featured {
            active.featured = Set(featured);
        }
        active.updated_at = Set(now_timestamp());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update content")?;

        Ok(Some(Content::try_from(model)?))
    }

    pub async fn get(&self, id: &str) -> Result<Option<Content>> {
        let model = content::Entity::find_by_id(id.to_string())
            .one(&self.conn)
            .await
            .context("Failed to query content")?;

        model.map(Content::try_from).transpose().map_err(Into::into)
    }

    pub async fn exists(&self, id: &str) -> Result<bool> {
        let found = content::Entity::find_by_id(id.to_string())
            .select_only()
            .column(content::Column::Id)
            .into_tuple::<String>()
            .one(&self.conn)
            .await
            .context("Failed to check content existence")?;

        Ok(found.is_some())
    }

    /// Newest first.
    pub async fn list(&self, filter: ContentFilter) -> Result<Vec<Content>> {
        let mut condition = Condition::all();
        if let Some(status) = filter.status {
            condition = condition.add(content::Column::Status.eq(status.as_str()));
        }
        if let Some(language) = filter.language {
            condition = condition.add(content::Column::Language.eq(language.as_str()));
        }

        let rows = content::Entity::find()
            .filter(condition)
            .order_by_desc(content::Column::CreatedAt)
            .limit(filter.limit)
            .all(&self.conn)
            .await
            .context("Failed to list content")?;

        rows.into_iter()
            .map(|row| Content::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Published and featured content, most recently published first.
    pub async fn list_featured(
        &self,
        language: Option<Language>,
        limit: u64,
    ) -> Result<Vec<Content>> {
        let mut query = content::Entity::find()
            .filter(content::Column::Status.eq(ContentStatus::Published.as_str()))
            .filter(content::Column::Featured.eq(true));
        if let Some(language) = language {
            query = query.filter(content::Column::Language.eq(language.as_str()));
        }

        let rows = query
            .order_by_desc(content::Column::PublishDate)
            .order_by_desc(content::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list featured content")?;

        rows.into_iter()
            .map(|row| Content::try_from(row).map_err(Into::into))
            .collect()
    }

    /// Deletes the row; media and analytics rows go with it through the
    /// foreign-key cascade. Returns false when nothing was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = content::Entity::delete_by_id(id.to_string())
            .exec(&self.conn)
            .await
            .context("Failed to delete content")?;

        Ok(result.rows_affected > 0)
    }
}
