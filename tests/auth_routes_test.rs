// ABOUTME: Authentication route tests over the full router
// ABOUTME: Registration, login failure opacity, logout, and the auth chain
//
// SPDX-License-Identifier: MIT OR Apache-2.0

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tutorhub::routes;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(Method::GET).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_register_issues_a_token() {
    let resources = common::test_resources().await;
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json(
            "/api/register",
            &json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "Passw0rdA"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["access_token"].as_str().unwrap().starts_with("tut_"));
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["email"], "ada@example.com");
    assert_eq!(body["user"]["role"], "student");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let resources = common::test_resources().await;
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json(
            "/api/register",
            &json!({
                "name": "Ada",
                "email": "ada@example.com",
                "password": "alllowercase"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Validation failed");
    assert!(body["errors"]["password"].is_array());
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let resources = common::test_resources().await;
    common::create_student(&resources, "taken@example.com", "Passw0rdA").await;
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json(
            "/api/register",
            &json!({
                "name": "Imposter",
                "email": "taken@example.com",
                "password": "Passw0rdB"
            }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let resources = common::test_resources().await;
    common::create_student(&resources, "real@example.com", "Passw0rdA").await;
    let app = routes::router(resources);

    let (unknown_status, unknown_body) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "email": "ghost@example.com", "password": "Passw0rdA" }),
            None,
        ),
    )
    .await;

    let (wrong_status, wrong_body) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "email": "real@example.com", "password": "WrongPass1" }),
            None,
        ),
    )
    .await;

    assert_eq!(unknown_status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(unknown_status, wrong_status);
    assert_eq!(unknown_body, wrong_body);
    assert_eq!(unknown_body["message"], "Authentication failed");
    assert_eq!(
        unknown_body["errors"]["email"][0],
        "The provided credentials are incorrect."
    );
}

#[tokio::test]
async fn test_login_then_me() {
    let resources = common::test_resources().await;
    let user = common::create_student(&resources, "me@example.com", "Passw0rdA").await;
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json(
            "/api/login",
            &json!({ "email": "me@example.com", "password": "Passw0rdA" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["access_token"].as_str().unwrap().to_owned();

    let (status, body) = send(&app, get("/api/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], user.id.to_string());
    assert_eq!(body["email"], "me@example.com");
}

#[tokio::test]
async fn test_missing_token_message() {
    let resources = common::test_resources().await;
    let app = routes::router(resources);

    let (status, body) = send(&app, get("/api/me", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "No token provided");
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_unknown_token_message() {
    let resources = common::test_resources().await;
    let app = routes::router(resources);

    let (status, body) = send(&app, get("/api/me", Some("tut_garbage"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_logout_revokes_every_session() {
    let resources = common::test_resources().await;
    let user = common::create_student(&resources, "bye@example.com", "Passw0rdA").await;

    let first = resources.session_manager.issue(&user).await.unwrap();
    let second = resources.session_manager.issue(&user).await.unwrap();
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json("/api/logout", &json!({}), Some(&first.plaintext)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully logged out");

    // Both sessions are dead, not only the one that logged out
    for token in [&first.plaintext, &second.plaintext] {
        let (status, body) = send(&app, get("/api/me", Some(token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
    }
}

#[tokio::test]
async fn test_student_cannot_create_lessons() {
    let resources = common::test_resources().await;
    let student = common::create_student(&resources, "kid@example.com", "Passw0rdA").await;
    let token = resources.session_manager.issue(&student).await.unwrap();
    let app = routes::router(resources);

    let (status, body) = send(
        &app,
        post_json(
            "/api/lessons",
            &json!({
                "title": "Forbidden",
                "content": "This content is certainly long enough to pass validation checks."
            }),
            Some(&token.plaintext),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body["message"],
        "You do not have the required permissions for this action."
    );
    // Permission denials carry no status field in the body
    assert!(body.get("status").is_none());
}
