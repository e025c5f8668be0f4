//! Smoke tests for the content, media and analytics flows used by the
//! admin panel and the public site.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use contenthub::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::path::PathBuf;
use tower::ServiceExt;

const BOUNDARY: &str = "contenthub-test-boundary";

async fn spawn_app() -> (Router, PathBuf) {
    let db_path =
        std::env::temp_dir().join(format!("contenthub-smoke-test-{}.db", uuid::Uuid::new_v4()));
    let media_path =
        std::env::temp_dir().join(format!("contenthub-smoke-media-{}", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.storage.media_path = media_path.display().to_string();
    config.storage.max_upload_bytes = 1024;
    config.server.secure_cookies = false;

    let state = contenthub::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    (contenthub::api::router(state).await, media_path)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::COOKIE, cookie);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let (status, _, bytes) = call(app, request).await;
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn signed_up(app: &Router, email: &str) -> String {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/sign-up")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "email": email, "password": "hunter22" }).to_string()))
        .unwrap();
    let (status, headers, _) = call(app, request).await;
    assert_eq!(status, StatusCode::OK);

    headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

async fn signed_in_admin(app: &Router) -> String {
    let cookie = signed_up(app, "editor@example.com").await;
    let (status, _) = send_json(app, "POST", "/api/roles/bootstrap", &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    cookie
}

fn multipart_upload(
    uri: &str,
    cookie: &str,
    file_name: &str,
    mime: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"altText\"\r\n\r\nA temple at dawn\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_content_lifecycle() {
    let (app, _) = spawn_app().await;
    let cookie = signed_in_admin(&app).await;

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/content",
        &cookie,
        Some(json!({ "title": "", "contentType": "video", "language": "en" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title, content type, and language are required");

    let (status, body) = send_json(
        &app,
        "POST",
        "/api/content",
        &cookie,
        Some(json!({
            "title": "Angkor Wat",
            "description": "",
            "contentType": "video",
            "language": "en",
            "publishDate": ""
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Content created successfully");
    let content = &body["data"];
    assert_eq!(content["status"], "draft");
    assert_eq!(content["featured"], false);
    assert_eq!(content["publish_date"], Value::Null);
    assert_eq!(content["description"], Value::Null);
    let id = content["id"].as_str().unwrap().to_string();

    // Analytics are created lazily with zero counters and reused afterwards
    let analytics_uri = format!("/api/content/{id}/analytics");
    let (status, first) = send_json(&app, "GET", &analytics_uri, &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    for counter in ["views", "likes", "shares", "comments"] {
        assert_eq!(first["data"][counter], 0, "{counter}");
    }
    let (_, second) = send_json(&app, "GET", &analytics_uri, &cookie, None).await;
    assert_eq!(first["data"]["id"], second["data"]["id"]);

    // Not featured yet
    let (_, public) = send_json(&app, "GET", "/api/public/featured", "", None).await;
    assert_eq!(public["data"], json!([]));

    let (status, body) = send_json(
        &app,
        "PUT",
        &format!("/api/content/{id}"),
        &cookie,
        Some(json!({
            "title": "Angkor Wat at sunrise",
            "contentType": "video",
            "language": "en",
            "status": "published",
            "featured": true,
            "publishDate": "2025-04-14"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "published");
    assert_eq!(body["data"]["publish_date"], "2025-04-14T00:00:00Z");

    let (status, public) =
        send_json(&app, "GET", "/api/public/featured?language=en&limit=5", "", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(public["data"][0]["title"], "Angkor Wat at sunrise");

    let (_, public) = send_json(&app, "GET", "/api/public/featured?language=km", "", None).await;
    assert_eq!(public["data"], json!([]));

    let (status, list) =
        send_json(&app, "GET", "/api/content?status=published", &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"].as_array().unwrap().len(), 1);

    let (status, _) = send_json(&app, "GET", "/api/content?status=pending", &cookie, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send_json(&app, "DELETE", &format!("/api/content/{id}"), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "GET", &format!("/api/content/{id}"), &cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send_json(&app, "GET", &analytics_uri, &cookie, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_media_upload_and_cleanup() {
    let (app, media_root) = spawn_app().await;
    let cookie = signed_in_admin(&app).await;

    let (_, body) = send_json(
        &app,
        "POST",
        "/api/content",
        &cookie,
        Some(json!({ "title": "Gallery", "contentType": "image", "language": "km" })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();
    let media_uri = format!("/api/content/{id}/media");

    let png = b"\x89PNG\r\n\x1a\nnot-really-an-image";
    let (status, _, bytes) = call(
        &app,
        multipart_upload(&media_uri, &cookie, "cover.png", "image/png", png),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", String::from_utf8_lossy(&bytes));
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let media = &body["data"];
    assert_eq!(media["media_type"], "image");
    assert_eq!(media["title"], "cover.png");
    assert_eq!(media["alt_text"], "A temple at dawn");
    assert!(media.get("storage_path").is_none());

    let url = media["url"].as_str().unwrap().to_string();
    assert!(url.starts_with(&format!("/media/{id}/")));
    assert!(url.ends_with(".png"));

    // The stored object is served under the public prefix
    let (status, _, served) = call(
        &app,
        Request::builder().uri(&url).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served, png);

    let (status, listed) = send_json(&app, "GET", &media_uri, &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"].as_array().unwrap().len(), 1);

    // Over the configured limit
    let (status, _, _) = call(
        &app,
        multipart_upload(&media_uri, &cookie, "huge.mp4", "video/mp4", &[0u8; 2048]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = call(
        &app,
        multipart_upload("/api/content/missing/media", &cookie, "a.png", "image/png", png),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send_json(&app, "DELETE", &format!("/api/content/{id}"), &cookie, None).await;
    assert_eq!(status, StatusCode::OK);

    let object = media_root.join(url.trim_start_matches("/media/"));
    assert!(!object.exists());
}

#[tokio::test]
async fn test_dashboard_reflects_permissions() {
    let (app, _) = spawn_app().await;
    let cookie = signed_in_admin(&app).await;

    send_json(
        &app,
        "POST",
        "/api/content",
        &cookie,
        Some(json!({ "title": "Draft", "contentType": "article", "language": "en" })),
    )
    .await;

    let (status, body) = send_json(&app, "GET", "/api/dashboard", &cookie, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "editor@example.com");
    assert_eq!(body["data"]["user"]["permissions"]["admin_panel"], true);
    assert_eq!(body["data"]["recent_content"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_refused_before_body_is_read() {
    let (app, _) = spawn_app().await;
    let admin = signed_in_admin(&app).await;
    let (_, body) = send_json(
        &app,
        "POST",
        "/api/content",
        &admin,
        Some(json!({ "title": "Locked", "contentType": "image", "language": "en" })),
    )
    .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let viewer = signed_up(&app, "viewer@example.com").await;

    // A malformed body would be a 400 if the handler parsed it first
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/content/{id}/media"))
        .header(header::COOKIE, &viewer)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from("not a multipart body"))
        .unwrap();
    let (status, _, bytes) = call(&app, request).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "You don't have permission to upload media");
}
