use serde::{Deserialize, Serialize};

use crate::entities::content_analytics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAnalytics {
    pub id: String,
    pub content_id: String,
    pub views: i64,
    pub likes: i64,
    pub shares: i64,
    pub comments: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<content_analytics::Model> for ContentAnalytics {
    fn from(model: content_analytics::Model) -> Self {
        Self {
            id: model.id,
            content_id: model.content_id,
            views: model.views,
            likes: model.likes,
            shares: model.shares,
            comments: model.comments,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
