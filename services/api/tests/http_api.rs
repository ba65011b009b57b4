//! End-to-end tests for the HTTP surface: router, handlers, stores, and the
//! uploads directory, with an in-memory SQLite database and a temp dir.

use api_lib::adapters::{blob::FsBlobStore, db::SqliteStore, password::Argon2Hasher};
use api_lib::config::Config;
use api_lib::web::{build_router, state::AppState};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use court_summarizer_core::services::{AuthService, SummaryService};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::sqlite::SqlitePoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "integration-test-boundary";

async fn test_app() -> (Router, TempDir) {
    let uploads = TempDir::new().unwrap();

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let store = Arc::new(SqliteStore::new(pool));
    store.run_migrations().await.unwrap();

    let blobs = Arc::new(FsBlobStore::new(uploads.path()));
    blobs.ensure_root().await.unwrap();

    let config = Arc::new(Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "sqlite::memory:".to_string(),
        uploads_dir: uploads.path().to_path_buf(),
        log_level: tracing::Level::INFO,
        max_upload_bytes: 10 * 1024 * 1024,
    });

    let state = Arc::new(AppState {
        summaries: SummaryService::new(store.clone(), blobs),
        auth: AuthService::new(store, Arc::new(Argon2Hasher)),
        config,
    });

    (build_router(state), uploads)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send_json(app: &Router, method: Method, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                .as_bytes(),
        );
    }
    if let Some((file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{file_name}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn send_multipart(app: &Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/summaries/save-with-file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn save_request(owner: &str, case: &str) -> Value {
    json!({
        "userEmail": owner,
        "caseName": case,
        "summaryFileName": format!("{case}.json"),
        "summaryData": {"judges": ["J. Lee"]}
    })
}

#[tokio::test]
async fn signup_login_and_profile_lookup() {
    let (app, _uploads) = test_app().await;

    let signup = json!({
        "name": "Asha",
        "email": "a@x.com",
        "password": "hunter2",
        "occupation": "advocate"
    });
    let (status, body) = send_json(&app, Method::POST, "/signup", signup.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User registered successfully.");

    // Same email again is a conflict.
    let (status, body) = send_json(&app, Method::POST, "/signup", signup).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Email already registered.");

    // A missing field is rejected up front.
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/signup",
        json!({"name": "Ben", "email": "b@y.com", "password": "pw"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/login",
        json!({"email": "a@x.com", "password": "hunter2"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful.");
    assert_eq!(
        body["user"],
        json!({"name": "Asha", "email": "a@x.com", "occupation": "advocate"})
    );

    // Wrong password and unknown email answer identically.
    let (status, wrong_pw) = send_json(
        &app,
        Method::POST,
        "/login",
        json!({"email": "a@x.com", "password": "nope"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, unknown) = send_json(
        &app,
        Method::POST,
        "/login",
        json!({"email": "ghost@x.com", "password": "hunter2"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);

    let (status, body) = get(&app, "/user?email=a@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["occupation"], "advocate");
    assert!(body.get("passwordHash").is_none());

    let (status, _) = get(&app, "/user").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/user?email=ghost@x.com").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "User not found.");
}

#[tokio::test]
async fn save_without_file_then_fetch_and_delete() {
    let (app, _uploads) = test_app().await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/summaries/save",
        save_request("a@x.com", "State v. Roe"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Summary saved successfully.");

    let summary = &body["summary"];
    assert_eq!(summary["userEmail"], "a@x.com");
    assert_eq!(summary["originalFileName"], "State v. Roe");
    assert!(summary.get("summaryPath").is_none());
    assert_eq!(summary["summaryData"]["judges"], json!(["J. Lee"]));
    assert_eq!(summary["summaryData"]["citations"], json!([]));
    let id = summary["id"].as_str().unwrap().to_string();

    let (status, body) = get(&app, "/summaries/user/a@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["summaries"][0]["id"].as_str().unwrap(), id);

    let (status, body) = get(&app, &format!("/summaries/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["caseName"], "State v. Roe");

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/summaries/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Summary deleted successfully.");

    // Second delete and fetch both see nothing.
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/summaries/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Summary not found.");

    let (status, _) = get(&app, &format!("/summaries/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_case_name_rejects_and_persists_nothing() {
    let (app, _uploads) = test_app().await;

    let mut request = save_request("a@x.com", "ignored");
    request.as_object_mut().unwrap().remove("caseName");

    let (status, body) = send_json(&app, Method::POST, "/summaries/save", request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Required fields missing.");

    let (_, body) = get(&app, "/summaries/user/a@x.com").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn save_with_file_round_trips_the_uploaded_bytes() {
    let (app, uploads) = test_app().await;
    let pdf = b"%PDF-1.4 fake court order";

    let body = multipart_body(
        &[
            ("userEmail", "a@x.com"),
            ("caseName", "State v. Roe"),
            ("summaryFileName", "roe.json"),
            ("summaryData", r#"{"judges":["J. Lee"]}"#),
        ],
        Some(("roe order.pdf", pdf)),
    );
    let (status, body) = send_multipart(&app, body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Summary and file saved successfully.");

    let summary = &body["summary"];
    let path = summary["summaryPath"].as_str().unwrap().to_string();
    assert!(path.starts_with("/uploads/"), "path: {path}");
    assert!(path.ends_with("roe_order.pdf"), "sanitized: {path}");
    let id = summary["id"].as_str().unwrap().to_string();

    // The stored bytes are served back from the recorded path.
    let request = Request::builder().uri(&path).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let served = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(served.as_ref(), &pdf[..]);

    // Deleting the record also removes the file.
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/summaries/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(std::fs::read_dir(uploads.path()).unwrap().count(), 0);

    let request = Request::builder().uri(&path).body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_summary_data_text_is_kept_as_raw() {
    let (app, _uploads) = test_app().await;

    let body = multipart_body(
        &[
            ("userEmail", "a@x.com"),
            ("caseName", "State v. Roe"),
            ("summaryFileName", "roe.json"),
            ("summaryData", "this is not { json"),
        ],
        None,
    );
    let (status, body) = send_multipart(&app, body).await;
    assert_eq!(status, StatusCode::CREATED);

    let data = &body["summary"]["summaryData"];
    assert_eq!(data["raw"], "this is not { json");
    assert_eq!(data["judges"], json!([]));
}

#[tokio::test]
async fn delete_succeeds_after_the_file_was_removed_externally() {
    let (app, uploads) = test_app().await;

    let body = multipart_body(
        &[
            ("userEmail", "a@x.com"),
            ("caseName", "State v. Roe"),
            ("summaryFileName", "roe.json"),
        ],
        Some(("roe.pdf", b"%PDF")),
    );
    let (status, body) = send_multipart(&app, body).await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["summary"]["id"].as_str().unwrap().to_string();
    let path = body["summary"]["summaryPath"].as_str().unwrap();
    let file_name = path.rsplit('/').next().unwrap();

    std::fs::remove_file(uploads.path().join(file_name)).unwrap();

    let request = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/summaries/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Summary deleted successfully.");
}

#[tokio::test]
async fn listing_is_newest_first_and_owner_scoped() {
    let (app, _uploads) = test_app().await;

    let mut ids = Vec::new();
    for case in ["t1", "t2", "t3"] {
        let (status, body) =
            send_json(&app, Method::POST, "/summaries/save", save_request("a@x.com", case)).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["summary"]["id"].as_str().unwrap().to_string());
        // Keep creation timestamps strictly increasing.
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    send_json(&app, Method::POST, "/summaries/save", save_request("b@y.com", "other")).await;

    let (status, body) = get(&app, "/summaries/user/a@x.com").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    let listed: Vec<&str> = body["summaries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[2].as_str(), ids[1].as_str(), ids[0].as_str()]);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let (app, _uploads) = test_app().await;

    let (status, body) = get(&app, &format!("/summaries/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Summary not found.");

    let (status, _) = get(&app, "/summaries/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
