//! `SeaORM` implementation of the `AnalyticsService` trait.

use async_trait::async_trait;
use tracing::debug;

use crate::db::Store;
use crate::domain::{Actor, policy::can_view_analytics};
use crate::models::ContentAnalytics;
use crate::services::analytics_service::{AnalyticsError, AnalyticsService};

pub struct SeaOrmAnalyticsService {
    store: Store,
}

impl SeaOrmAnalyticsService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AnalyticsService for SeaOrmAnalyticsService {
    async fn get_or_create(&self, content_id: &str) -> Result<ContentAnalytics, AnalyticsError> {
        if !self.store.content_repo().exists(content_id).await? {
            return Err(AnalyticsError::NotFound(content_id.to_string()));
        }

        let repo = self.store.analytics_repo();
        if let Some(existing) = repo.find_by_content(content_id).await? {
            return Ok(existing);
        }

        if let Some(created) = repo.insert_zeroed(content_id).await? {
            debug!(content_id, "Initialized content analytics");
            return Ok(created);
        }

        // A concurrent request inserted the row between our read and write.
        repo.find_by_content(content_id).await?.ok_or_else(|| {
            AnalyticsError::Store(format!("Analytics row for {content_id} vanished"))
        })
    }

    async fn view(
        &self,
        actor: &Actor,
        content_id: &str,
    ) -> Result<ContentAnalytics, AnalyticsError> {
        if !can_view_analytics(&actor.roles) {
            return Err(AnalyticsError::Unauthorized(
                "You don't have permission to view analytics".to_string(),
            ));
        }
        self.get_or_create(content_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::user::hash_password;
    use crate::domain::{ContentType, Language, Role, RoleSet};
    use crate::models::ContentFields;

    async fn seeded() -> (Store, String) {
        let store = crate::db::test_store().await;
        let hash = hash_password("secret-pass", None).unwrap();
        let user = store
            .user_repo()
            .create("stats@example.com", None, hash)
            .await
            .unwrap()
            .unwrap();
        let content = store
            .content_repo()
            .insert(
                &user.id,
                &ContentFields {
                    title: "Clip".to_string(),
                    description: None,
                    content_type: ContentType::Video,
                    language: Language::En,
                    status: None,
                    featured: None,
                    publish_date: None,
                },
            )
            .await
            .unwrap();
        (store, content.id)
    }

    #[tokio::test]
    async fn first_access_creates_zeroed_row_and_second_reuses_it() {
        let (store, content_id) = seeded().await;
        let service = SeaOrmAnalyticsService::new(store);

        let first = service.get_or_create(&content_id).await.unwrap();
        assert_eq!(
            (first.views, first.likes, first.shares, first.comments),
            (0, 0, 0, 0)
        );

        let second = service.get_or_create(&content_id).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn concurrent_first_access_yields_one_row() {
        let (store, content_id) = seeded().await;
        let service = std::sync::Arc::new(SeaOrmAnalyticsService::new(store));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                let id = content_id.clone();
                tokio::spawn(async move { service.get_or_create(&id).await.unwrap() })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap().id);
        }
        ids.dedup();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn missing_content_is_not_found() {
        let (store, _) = seeded().await;
        let service = SeaOrmAnalyticsService::new(store);
        assert!(matches!(
            service.get_or_create("c1").await,
            Err(AnalyticsError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn viewing_requires_admin_access() {
        let (store, content_id) = seeded().await;
        let service = SeaOrmAnalyticsService::new(store);

        let creator = Actor::new("u", [Role::ContentCreator].into_iter().collect::<RoleSet>());
        assert!(matches!(
            service.view(&creator, &content_id).await,
            Err(AnalyticsError::Unauthorized(_))
        ));

        let moderator = Actor::new("u", [Role::Moderator].into_iter().collect::<RoleSet>());
        assert!(service.view(&moderator, &content_id).await.is_ok());
    }
}
