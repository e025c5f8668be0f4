//! Object storage for uploaded media.
//!
//! The shipped backend writes objects below a local directory that the HTTP
//! server exposes under a public URL prefix.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::StorageConfig;

const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid object path: {0}")]
    InvalidPath(String),

    #[error("The resource already exists")]
    AlreadyExists,

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes written so far out of the total upload size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub written: u64,
    pub total: u64,
}

impl UploadProgress {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            self.written as f64 * 100.0 / self.total as f64
        }
    }
}

pub type ProgressFn<'a> = &'a (dyn Fn(UploadProgress) + Send + Sync);

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes a new object. Fails with [`StorageError::AlreadyExists`]
    /// instead of overwriting.
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: Option<ProgressFn<'_>>,
    ) -> Result<(), StorageError>;

    /// Public URL the object can be fetched from.
    fn public_url(&self, path: &str) -> String;

    async fn remove(&self, path: &str) -> Result<(), StorageError>;
}

pub struct LocalObjectStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalObjectStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        let prefix = format!(
            "{}{}",
            config.public_base_url.trim_end_matches('/'),
            config.public_prefix
        );
        Self::new(&config.media_path, prefix)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves an object key below the root, rejecting anything that could
    /// escape it.
    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        let is_plain = !path.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        if is_plain {
            Ok(self.root.join(relative))
        } else {
            Err(StorageError::InvalidPath(path.to_string()))
        }
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        path: &str,
        bytes: &[u8],
        progress: Option<ProgressFn<'_>>,
    ) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists);
            }
            Err(e) => return Err(e.into()),
        };

        let total = bytes.len() as u64;
        let mut written = 0u64;
        for chunk in bytes.chunks(CHUNK_SIZE) {
            file.write_all(chunk).await?;
            written += chunk.len() as u64;
            if let Some(report) = progress {
                report(UploadProgress { written, total });
            }
        }
        file.flush().await?;

        debug!(path = %target.display(), bytes = total, "Stored object");
        Ok(())
    }

    fn public_url(&self, path: &str) -> String {
        let encoded: Vec<_> = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();
        format!("{}/{}", self.url_prefix, encoded.join("/"))
    }

    async fn remove(&self, path: &str) -> Result<(), StorageError> {
        let target = self.resolve(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path, "Object already gone");
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}
