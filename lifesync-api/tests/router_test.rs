/// Router tests that need no database
///
/// The pool points at a closed port, so these only cover behavior decided
/// before the first query: token rejection, body validation, metadata and
/// headers.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Duration;
use common::{offline_app, send, TEST_SECRET};
use lifesync_shared::auth::jwt::{create_token, Claims};
use serde_json::json;
use tower::Service as _;
use uuid::Uuid;

#[tokio::test]
async fn test_root_metadata() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "LifeSync API");
    assert_eq!(body["status"], "running");
    assert_eq!(body["endpoints"]["familyNumbers"], "/api/family-numbers");
}

#[tokio::test]
async fn test_health_reports_disconnected_database() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["database"], "disconnected");
}

#[tokio::test]
async fn test_missing_token() {
    let app = offline_app();

    for uri in ["/api/expenses", "/api/auth/me", "/api/family-numbers/emergency"] {
        let (status, body) = send(&app, Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
        assert_eq!(body["message"], "No token provided");
    }
}

#[tokio::test]
async fn test_non_bearer_scheme_counts_as_missing() {
    let mut app = offline_app();

    let response = app
        .call(
            Request::builder()
                .uri("/api/tasks")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token() {
    let app = offline_app();

    let (status, body) = send(&app, Method::GET, "/api/budgets", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let forged = create_token(&Claims::new(Uuid::new_v4()), "some-other-secret-32-bytes-long!!").unwrap();
    let (status, body) = send(&app, Method::GET, "/api/budgets", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_expired_token() {
    let app = offline_app();

    let claims = Claims::with_expiration(Uuid::new_v4(), Duration::hours(-1));
    let token = create_token(&claims, TEST_SECRET).unwrap();

    let (status, body) = send(&app, Method::GET, "/api/savings", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_register_validation_runs_before_database() {
    let app = offline_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "", "email": "not-an-email", "password": "123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_json_400() {
    let mut app = offline_app();

    let response = app
        .call(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{\"email\":"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let mut app = offline_app();

    let response = app
        .call(Request::builder().uri("/api/expenses").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers().get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}
