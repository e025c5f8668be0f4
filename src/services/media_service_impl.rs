//! `SeaORM` + object store implementation of the `MediaService` trait.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::db::Store;
use crate::db::repositories::media::NewMedia;
use crate::domain::{Actor, MediaType, can_manage_content, has_admin_access, non_blank};
use crate::models::Media;
use crate::services::media_service::{MediaError, MediaService, MediaUpload};
use crate::storage::{ObjectStore, ProgressFn};

pub struct DefaultMediaService {
    store: Store,
    objects: Arc<dyn ObjectStore>,
    max_upload_bytes: usize,
}

impl DefaultMediaService {
    #[must_use]
    pub fn new(store: Store, objects: Arc<dyn ObjectStore>, max_upload_bytes: usize) -> Self {
        Self {
            store,
            objects,
            max_upload_bytes,
        }
    }
}

/// Declared MIME type, or one guessed from the file name.
fn resolve_mime(upload: &MediaUpload) -> String {
    non_blank(upload.content_type.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| {
            mime_guess::from_path(&upload.file_name)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
}

/// `{content_id}/{unix_millis}.{ext}`; the extension falls back to `bin`.
fn object_path(content_id: &str, file_name: &str) -> String {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty() && e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase);
    let millis = chrono::Utc::now().timestamp_millis();
    format!("{content_id}/{millis}.{ext}")
}

/// Upload gate. The HTTP handler also runs it before reading the multipart
/// body.
pub fn ensure_can_upload(actor: &Actor) -> Result<(), MediaError> {
    if can_manage_content(&actor.roles) {
        Ok(())
    } else {
        Err(MediaError::Unauthorized(
            "You don't have permission to upload media".to_string(),
        ))
    }
}

#[async_trait]
impl MediaService for DefaultMediaService {
    async fn upload(
        &self,
        actor: &Actor,
        content_id: &str,
        upload: MediaUpload,
        progress: Option<ProgressFn<'_>>,
    ) -> Result<Media, MediaError> {
        ensure_can_upload(actor)?;
        if !self.store.content_repo().exists(content_id).await? {
            return Err(MediaError::NotFound(content_id.to_string()));
        }
        if upload.bytes.is_empty() {
            return Err(MediaError::Validation("File is required".to_string()));
        }
        if upload.bytes.len() > self.max_upload_bytes {
            return Err(MediaError::Validation(format!(
                "File exceeds the {} byte upload limit",
                self.max_upload_bytes
            )));
        }

        let mime = resolve_mime(&upload);
        let media_type = MediaType::from_mime(&mime);
        let path = object_path(content_id, &upload.file_name);

        self.objects.upload(&path, &upload.bytes, progress).await?;
        let url = self.objects.public_url(&path);

        let title = non_blank(upload.title.as_deref())
            .or_else(|| non_blank(Some(&upload.file_name)))
            .map(str::to_string);

        let inserted = self
            .store
            .media_repo()
            .insert(NewMedia {
                content_id: content_id.to_string(),
                url,
                storage_path: path.clone(),
                media_type,
                title,
                alt_text: non_blank(upload.alt_text.as_deref()).map(str::to_string),
            })
            .await;

        match inserted {
            Ok(media) => {
                info!(
                    content_id,
                    media_id = %media.id,
                    media_type = %media_type,
                    bytes = upload.bytes.len(),
                    "Media uploaded"
                );
                Ok(media)
            }
            Err(e) => {
                if let Err(cleanup) = self.objects.remove(&path).await {
                    warn!(path, error = %cleanup, "Failed to remove orphaned object");
                }
                Err(e.into())
            }
        }
    }

    async fn list_media(&self, actor: &Actor, content_id: &str) -> Result<Vec<Media>, MediaError> {
        if !has_admin_access(&actor.roles) {
            return Err(MediaError::Unauthorized(
                "You don't have permission to view media".to_string(),
            ));
        }
        Ok(self.store.media_repo().list_for_content(content_id).await?)
    }
}
