use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AnalyticsService, AuthService, ContentService, DefaultMediaService, MediaService, RoleService,
    SeaOrmAnalyticsService, SeaOrmAuthService, SeaOrmContentService, SeaOrmRoleService,
};
use crate::storage::{LocalObjectStore, ObjectStore};

/// Explicit handles to every collaborator. Built once at startup and cloned
/// into request handlers.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub objects: Arc<dyn ObjectStore>,

    pub auth_service: Arc<dyn AuthService>,

    pub role_service: Arc<dyn RoleService>,

    pub content_service: Arc<dyn ContentService>,

    pub media_service: Arc<dyn MediaService>,

    pub analytics_service: Arc<dyn AnalyticsService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let objects: Arc<dyn ObjectStore> =
            Arc::new(LocalObjectStore::from_config(&config.storage));
        Ok(Self::with_parts(config, store, objects))
    }

    /// Wires services around an already opened store and object store.
    #[must_use]
    pub fn with_parts(config: Config, store: Store, objects: Arc<dyn ObjectStore>) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
        ));
        let role_service = Arc::new(SeaOrmRoleService::new(store.clone()));
        let content_service = Arc::new(SeaOrmContentService::new(store.clone(), objects.clone()));
        let media_service = Arc::new(DefaultMediaService::new(
            store.clone(),
            objects.clone(),
            config.storage.max_upload_bytes,
        ));
        let analytics_service = Arc::new(SeaOrmAnalyticsService::new(store.clone()));

        Self {
            config: Arc::new(RwLock::new(config)),
            store,
            objects,
            auth_service,
            role_service,
            content_service,
            media_service,
            analytics_service,
        }
    }
}
