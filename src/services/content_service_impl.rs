//! `SeaORM` implementation of the `ContentService` trait.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Store;
use crate::db::repositories::content::ContentFilter;
use crate::domain::{
    Actor, ContentStatus, ContentType, Language, can_manage_content, has_admin_access, non_blank,
};
use crate::models::{Content, ContentFields};
use crate::services::content_service::{ContentError, ContentInput, ContentService};
use crate::storage::ObjectStore;

const CREATE_REQUIRED: &str = "Title, content type, and language are required";
const UPDATE_REQUIRED: &str = "Content ID, title, content type, and language are required";

pub struct SeaOrmContentService {
    store: Store,
    objects: Arc<dyn ObjectStore>,
}

impl SeaOrmContentService {
    #[must_use]
    pub fn new(store: Store, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }
}

fn require_manage(actor: &Actor, action: &str) -> Result<(), ContentError> {
    if can_manage_content(&actor.roles) {
        Ok(())
    } else {
        Err(ContentError::Unauthorized(format!(
            "You don't have permission to {action} content"
        )))
    }
}

fn require_admin_access(actor: &Actor) -> Result<(), ContentError> {
    if has_admin_access(&actor.roles) {
        Ok(())
    } else {
        Err(ContentError::Unauthorized(
            "You don't have permission to view content".to_string(),
        ))
    }
}

/// Validates form values into typed fields. `required` is the message used
/// when a mandatory field is blank.
fn parse_fields(input: &ContentInput, required: &str) -> Result<ContentFields, ContentError> {
    let (Some(title), Some(content_type), Some(language)) = (
        non_blank(input.title.as_deref()),
        non_blank(input.content_type.as_deref()),
        non_blank(input.language.as_deref()),
    ) else {
        return Err(ContentError::Validation(required.to_string()));
    };

    let invalid = |e: crate::domain::ParseEnumError| ContentError::Validation(e.to_string());

    let status = non_blank(input.status.as_deref())
        .map(str::parse::<ContentStatus>)
        .transpose()
        .map_err(invalid)?;

    Ok(ContentFields {
        title: title.to_string(),
        description: non_blank(input.description.as_deref()).map(str::to_string),
        content_type: content_type.parse::<ContentType>().map_err(invalid)?,
        language: language.parse::<Language>().map_err(invalid)?,
        status,
        featured: input.featured,
        publish_date: normalize_publish_date(input.publish_date.as_deref())?,
    })
}

/// Blank input means "no date". Accepts RFC 3339, `YYYY-MM-DDTHH:MM` as sent
/// by datetime-local inputs (read as UTC), or a bare `YYYY-MM-DD` (midnight
/// UTC), and stores RFC 3339.
pub fn normalize_publish_date(raw: Option<&str>) -> Result<Option<String>, ContentError> {
    let Some(raw) = non_blank(raw) else {
        return Ok(None);
    };

    let parsed: DateTime<Utc> = if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        dt.with_timezone(&Utc)
    } else if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        naive.and_utc()
    } else if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        naive.and_utc()
    } else {
        return Err(ContentError::Validation(format!(
            "Invalid publish date: {raw}"
        )));
    };

    Ok(Some(parsed.to_rfc3339_opts(SecondsFormat::Secs, true)))
}

#[async_trait]
impl ContentService for SeaOrmContentService {
    async fn create_content(
        &self,
        actor: &Actor,
        input: ContentInput,
    ) -> Result<Content, ContentError> {
        require_manage(actor, "create")?;
        let fields = parse_fields(&input, CREATE_REQUIRED)?;

        let content = self
            .store
            .content_repo()
            .insert(&actor.user_id, &fields)
            .await?;

        info!(content_id = %content.id, user_id = %actor.user_id, "Content created");
        Ok(content)
    }

    async fn update_content(
        &self,
        actor: &Actor,
        content_id: &str,
        input: ContentInput,
    ) -> Result<Content, ContentError> {
        require_manage(actor, "update")?;
        let Some(content_id) = non_blank(Some(content_id)) else {
            return Err(ContentError::Validation(UPDATE_REQUIRED.to_string()));
        };
        let fields = parse_fields(&input, UPDATE_REQUIRED)?;

        let content = self
            .store
            .content_repo()
            .update(content_id, &fields)
            .await?
            .ok_or_else(|| ContentError::NotFound(content_id.to_string()))?;

        info!(content_id, user_id = %actor.user_id, "Content updated");
        Ok(content)
    }

    async fn delete_content(&self, actor: &Actor, content_id: &str) -> Result<(), ContentError> {
        require_manage(actor, "delete")?;
        let Some(content_id) = non_blank(Some(content_id)) else {
            return Err(ContentError::Validation("Content ID is required".to_string()));
        };

        let paths = self
            .store
            .media_repo()
            .storage_paths_for_content(content_id)
            .await?;

        if !self.store.content_repo().delete(content_id).await? {
            return Err(ContentError::NotFound(content_id.to_string()));
        }

        for path in &paths {
            if let Err(e) = self.objects.remove(path).await {
                warn!(content_id, path, error = %e, "Failed to remove media object");
            }
        }

        info!(
            content_id,
            user_id = %actor.user_id,
            media_objects = paths.len(),
            "Content deleted"
        );
        Ok(())
    }

    async fn get_content(&self, actor: &Actor, content_id: &str) -> Result<Content, ContentError> {
        require_admin_access(actor)?;
        self.store
            .content_repo()
            .get(content_id)
            .await?
            .ok_or_else(|| ContentError::NotFound(content_id.to_string()))
    }

    async fn list_content(
        &self,
        actor: &Actor,
        filter: ContentFilter,
    ) -> Result<Vec<Content>, ContentError> {
        require_admin_access(actor)?;
        Ok(self.store.content_repo().list(filter).await?)
    }

    async fn list_featured(
        &self,
        language: Option<Language>,
        limit: u64,
    ) -> Result<Vec<Content>, ContentError> {
        Ok(self
            .store
            .content_repo()
            .list_featured(language, limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::media::NewMedia;
    use crate::db::repositories::user::hash_password;
    use crate::db::test_store;
    use crate::domain::{MediaType, Role, RoleSet};
    use crate::storage::LocalObjectStore;

    async fn setup() -> (Store, SeaOrmContentService, String) {
        let store = test_store().await;
        let hash = hash_password("secret-pass", None).unwrap();
        let user = store
            .user_repo()
            .create("editor@example.com", None, hash)
            .await
            .unwrap()
            .unwrap();
        let root =
            std::env::temp_dir().join(format!("contenthub-objects-{}", uuid::Uuid::new_v4()));
        let objects: Arc<dyn ObjectStore> = Arc::new(LocalObjectStore::new(root, "/media"));
        let service = SeaOrmContentService::new(store.clone(), objects);
        (store, service, user.id)
    }

    fn actor(user_id: &str, roles: &[Role]) -> Actor {
        Actor::new(user_id, roles.iter().copied().collect::<RoleSet>())
    }

    fn valid_input() -> ContentInput {
        ContentInput {
            title: Some("Angkor at dawn".to_string()),
            content_type: Some("video".to_string()),
            language: Some("km".to_string()),
            ..ContentInput::default()
        }
    }

    #[tokio::test]
    async fn moderator_creates_draft_with_defaults() {
        let (_, service, user_id) = setup().await;
        let content = service
            .create_content(&actor(&user_id, &[Role::Moderator]), valid_input())
            .await
            .unwrap();

        assert_eq!(content.status, ContentStatus::Draft);
        assert!(!content.featured);
        assert_eq!(content.publish_date, None);
        assert_eq!(content.user_id, user_id);
    }

    #[tokio::test]
    async fn create_without_roles_is_unauthorized() {
        let (store, service, user_id) = setup().await;
        let err = service
            .create_content(&actor(&user_id, &[]), valid_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));

        let err = service
            .create_content(&actor(&user_id, &[Role::ContentCreator]), valid_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));

        assert!(
            store
                .content_repo()
                .list(ContentFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn missing_required_fields_persist_nothing() {
        let (store, service, user_id) = setup().await;
        let admin = actor(&user_id, &[Role::Admin]);

        let blanks = [
            ContentInput {
                title: Some("  ".to_string()),
                ..valid_input()
            },
            ContentInput {
                content_type: None,
                ..valid_input()
            },
            ContentInput {
                language: Some(String::new()),
                ..valid_input()
            },
        ];
        for input in blanks {
            let err = service.create_content(&admin, input).await.unwrap_err();
            match err {
                ContentError::Validation(msg) => assert_eq!(msg, CREATE_REQUIRED),
                other => panic!("unexpected error: {other:?}"),
            }
        }

        assert!(
            store
                .content_repo()
                .list(ContentFilter::default())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn permission_is_checked_before_validation() {
        let (_, service, user_id) = setup().await;
        let err = service
            .create_content(&actor(&user_id, &[]), ContentInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_vocabulary_is_rejected() {
        let (_, service, user_id) = setup().await;
        let err = service
            .create_content(
                &actor(&user_id, &[Role::Admin]),
                ContentInput {
                    language: Some("fr".to_string()),
                    ..valid_input()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(ref m) if m == "Invalid language: fr"));
    }

    #[tokio::test]
    async fn unauthorized_update_and_delete_leave_row_unchanged() {
        let (store, service, user_id) = setup().await;
        let created = service
            .create_content(&actor(&user_id, &[Role::Admin]), valid_input())
            .await
            .unwrap();
        let creator = actor(&user_id, &[Role::ContentCreator]);

        let err = service
            .update_content(
                &creator,
                &created.id,
                ContentInput {
                    title: Some("Hijacked".to_string()),
                    ..valid_input()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));

        let err = service.delete_content(&creator, &created.id).await.unwrap_err();
        assert!(matches!(err, ContentError::Unauthorized(_)));

        let stored = store.content_repo().get(&created.id).await.unwrap().unwrap();
        assert_eq!(stored, created);
    }

    #[tokio::test]
    async fn update_replaces_fields_and_reports_missing_rows() {
        let (_, service, user_id) = setup().await;
        let admin = actor(&user_id, &[Role::Admin]);
        let created = service.create_content(&admin, valid_input()).await.unwrap();

        let updated = service
            .update_content(
                &admin,
                &created.id,
                ContentInput {
                    title: Some("Renamed".to_string()),
                    status: Some("published".to_string()),
                    featured: Some(true),
                    publish_date: Some("2025-03-01".to_string()),
                    ..valid_input()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.status, ContentStatus::Published);
        assert!(updated.featured);
        assert_eq!(updated.publish_date.as_deref(), Some("2025-03-01T00:00:00Z"));

        let err = service
            .update_content(&admin, "", valid_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::Validation(ref m) if m == UPDATE_REQUIRED));

        let err = service
            .update_content(&admin, "no-such-id", valid_input())
            .await
            .unwrap_err();
        assert!(matches!(err, ContentError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_row_and_cascades() {
        let (store, service, user_id) = setup().await;
        let admin = actor(&user_id, &[Role::Admin]);
        let created = service.create_content(&admin, valid_input()).await.unwrap();
        store
            .analytics_repo()
            .insert_zeroed(&created.id)
            .await
            .unwrap();
        store
            .media_repo()
            .insert(NewMedia {
                content_id: created.id.clone(),
                url: format!("/media/{}/1.png", created.id),
                storage_path: format!("{}/1.png", created.id),
                media_type: MediaType::Image,
                title: Some("cover".to_string()),
                alt_text: None,
            })
            .await
            .unwrap();
        assert_eq!(
            store
                .media_repo()
                .list_for_content(&created.id)
                .await
                .unwrap()
                .len(),
            1
        );

        service.delete_content(&admin, &created.id).await.unwrap();

        assert!(store.content_repo().get(&created.id).await.unwrap().is_none());
        assert!(
            store
                .analytics_repo()
                .find_by_content(&created.id)
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .media_repo()
                .list_for_content(&created.id)
                .await
                .unwrap()
                .is_empty()
        );
        assert!(matches!(
            service.delete_content(&admin, &created.id).await,
            Err(ContentError::NotFound(_))
        ));
    }

    #[test]
    fn publish_date_normalization() {
        assert_eq!(normalize_publish_date(None).unwrap(), None);
        assert_eq!(normalize_publish_date(Some("   ")).unwrap(), None);
        assert_eq!(
            normalize_publish_date(Some("2025-01-02T03:04:05+07:00")).unwrap().as_deref(),
            Some("2025-01-01T20:04:05Z")
        );
        assert_eq!(
            normalize_publish_date(Some("2025-01-02T03:04")).unwrap().as_deref(),
            Some("2025-01-02T03:04:00Z")
        );
        assert!(normalize_publish_date(Some("next tuesday")).is_err());
    }
}
