//! Request telemetry and response hardening.
//!
//! Every request gets a span, a `http_requests_total` count and a
//! `http_request_duration_seconds` sample keyed by matched route. Requests
//! refused by the session gate or the access policy are also counted in
//! `http_access_denied_total`, labelled with the role set that was refused.

use axum::{
    extract::{MatchedPath, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use crate::api::AppState;
use crate::domain::{Actor, RoleSet};

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";

/// Uploaded objects are user supplied and always served sandboxed.
const OBJECT_CSP: &str = "sandbox; default-src 'none'; img-src 'self'; media-src 'self'";

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// How a finished request is reported in logs.
fn outcome(status: StatusCode) -> &'static str {
    match status {
        StatusCode::UNAUTHORIZED => "unauthenticated",
        StatusCode::FORBIDDEN => "forbidden",
        s if s.is_server_error() => "error",
        s if s.is_client_error() => "client_error",
        _ => "success",
    }
}

/// Bounded label for a role set: `admin,moderator`, or `none`.
fn roles_label(roles: &RoleSet) -> String {
    if roles.is_empty() {
        return "none".to_string();
    }
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| path.clone(), |mp| mp.as_str().to_string());

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        path = %path,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();

        // Set by the session middleware on protected routes
        let actor = response.extensions().get::<Actor>();
        if let Some(actor) = actor {
            tracing::Span::current().record("user_id", actor.user_id.as_str());
        }

        let labels = [
            ("method", method.clone()),
            ("path", route.clone()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(start.elapsed().as_secs_f64());

        let outcome = outcome(status);
        if matches!(outcome, "unauthenticated" | "forbidden") {
            let roles = actor.map_or_else(|| "anonymous".to_string(), |a| roles_label(&a.roles));
            metrics::counter!(
                "http_access_denied_total",
                "method" => method.clone(),
                "path" => route.clone(),
                "reason" => outcome,
                "roles" => roles
            )
            .increment(1);
        }

        info!(
            status_code = status.as_u16(),
            duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
            route = %route,
            outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

fn apply_security_headers(path: &str, headers: &mut HeaderMap) {
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    if path.starts_with("/api/") {
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(API_CSP),
        );
        // Responses carry session-scoped data
        headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    } else {
        headers.insert(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(OBJECT_CSP),
        );
    }
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut response = next.run(req).await;
    apply_security_headers(&path, response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Role;

    #[test]
    fn denials_are_classified_separately() {
        assert_eq!(outcome(StatusCode::OK), "success");
        assert_eq!(outcome(StatusCode::UNAUTHORIZED), "unauthenticated");
        assert_eq!(outcome(StatusCode::FORBIDDEN), "forbidden");
        assert_eq!(outcome(StatusCode::NOT_FOUND), "client_error");
        assert_eq!(outcome(StatusCode::BAD_GATEWAY), "error");
    }

    #[test]
    fn role_labels_are_stable() {
        assert_eq!(roles_label(&RoleSet::default()), "none");
        let roles: RoleSet = [Role::Moderator, Role::Admin].into_iter().collect();
        assert_eq!(roles_label(&roles), "admin,moderator");
    }

    #[test]
    fn uploaded_objects_are_sandboxed() {
        let mut headers = HeaderMap::new();
        apply_security_headers("/media/abc/1.svg", &mut headers);
        assert_eq!(headers[header::CONTENT_SECURITY_POLICY], OBJECT_CSP);
        assert!(headers.get(header::CACHE_CONTROL).is_none());

        let mut headers = HeaderMap::new();
        apply_security_headers("/api/content", &mut headers);
        assert_eq!(headers[header::CONTENT_SECURITY_POLICY], API_CSP);
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
    }
}
