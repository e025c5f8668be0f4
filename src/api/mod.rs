use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::state::SharedState;

pub mod auth;
mod content;
mod dashboard;
mod error;
mod media;
mod observability;
mod public;
mod roles;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use tokio::sync::RwLock;

use crate::services::{AnalyticsService, AuthService, ContentService, MediaService, RoleService};
use metrics_exporter_prometheus::PrometheusHandle;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn role_service(&self) -> &Arc<dyn RoleService> {
        &self.shared.role_service
    }

    #[must_use]
    pub fn content_service(&self) -> &Arc<dyn ContentService> {
        &self.shared.content_service
    }

    #[must_use]
    pub fn media_service(&self) -> &Arc<dyn MediaService> {
        &self.shared.media_service
    }

    #[must_use]
    pub fn analytics_service(&self) -> &Arc<dyn AnalyticsService> {
        &self.shared.analytics_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let (server, storage) = {
        let config = state.config().read().await;
        (config.server.clone(), config.storage.clone())
    };

    let protected_routes = create_protected_router(state.clone(), storage.max_upload_bytes);

    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            server.session_inactivity_minutes,
        )));

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/callback", get(auth::callback))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/public/featured", get(public::featured_content))
        .layer(session_layer)
        .with_state(state.clone());

    let cors_layer = if server.cors_allowed_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = server
            .cors_allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .nest_service(
            &storage.public_prefix,
            tower_http::services::ServeDir::new(&storage.media_path),
        )
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/dashboard", get(dashboard::get_dashboard))
        .route(
            "/content",
            get(content::list_content).post(content::create_content),
        )
        .route(
            "/content/{id}",
            get(content::get_content)
                .put(content::update_content)
                .delete(content::delete_content),
        )
        .route(
            "/content/{id}/media",
            get(media::list_media)
                .post(media::upload_media)
                .layer(DefaultBodyLimit::max(
                    max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES),
                )),
        )
        .route("/content/{id}/analytics", get(content::get_analytics))
        .route("/users", get(roles::list_users))
        .route(
            "/roles",
            get(roles::list_assignments).post(roles::grant_role),
        )
        .route("/roles/{id}", delete(roles::revoke_role))
        .route("/roles/bootstrap", post(roles::bootstrap_admin))
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
