use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::db::is_unique_violation;
use crate::domain::now_timestamp;
use crate::entities::content_analytics;
use crate::models::ContentAnalytics;

pub struct AnalyticsRepository {
    conn: DatabaseConnection,
}

impl AnalyticsRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// "No row yet" is `Ok(None)`, not an error.
    pub async fn find_by_content(&self, content_id: &str) -> Result<Option<ContentAnalytics>> {
        let row = content_analytics::Entity::find()
            .filter(content_analytics::Column::ContentId.eq(content_id))
            .one(&self.conn)
            .await
            .context("Failed to query content analytics")?;

        Ok(row.map(ContentAnalytics::from))
    }

    /// Inserts a zeroed row. Returns `None` when another writer created the
    /// row first.
    pub async fn insert_zeroed(&self, content_id: &str) -> Result<Option<ContentAnalytics>> {
        let now = now_timestamp();
        let active = content_analytics::ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            content_id: Set(content_id.to_string()),
            views: Set(0),
            likes: Set(0),
            shares: Set(0),
            comments: Set(0),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(ContentAnalytics::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to create content analytics"),
        }
    }
}
