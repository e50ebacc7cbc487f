// ABOUTME: Lesson, question, and AI route tests over the full router
// ABOUTME: Gating, validation, 404 handling, and the stored Q&A flow
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

fn post_json(uri: &str, body: &Value, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

const LONG_CONTENT: &str =
    "Ownership is Rust's central concept: every value has a single owner, \
     and the value is dropped when the owner goes out of scope.";

struct Setup {
    app: Router,
    admin_token: String,
    student_token: String,
}

async fn setup() -> Setup {
    let resources = common::test_resources().await;
    let admin = common::create_admin(&resources, "admin@example.com", "Passw0rdA").await;
    let student = common::create_student(&resources, "student@example.com", "Passw0rdB").await;
    let admin_token = resources.session_manager.issue(&admin).await.unwrap().plaintext;
    let student_token = resources
        .session_manager
        .issue(&student)
        .await
        .unwrap()
        .plaintext;
    Setup {
        app: routes::router(resources),
        admin_token,
        student_token,
    }
}

async fn create_lesson(setup: &Setup, title: &str) -> String {
    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/lessons",
            &json!({ "title": title, "content": LONG_CONTENT }),
            &setup.admin_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn test_admin_creates_and_student_reads_lesson() {
    let setup = setup().await;
    let lesson_id = create_lesson(&setup, "Ownership").await;

    let (status, body) = send(
        &setup.app,
        get(&format!("/api/lessons/{lesson_id}"), &setup.student_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["lesson"]["title"], "Ownership");
    assert!(body["recent_questions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_lesson_content_must_be_substantial() {
    let setup = setup().await;
    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/lessons",
            &json!({ "title": "Too short", "content": "tiny" }),
            &setup.admin_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["content"].is_array());
}

#[tokio::test]
async fn test_duplicate_lesson_title_rejected() {
    let setup = setup().await;
    create_lesson(&setup, "Unique title").await;

    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/lessons",
            &json!({ "title": "Unique title", "content": LONG_CONTENT }),
            &setup.admin_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["errors"]["title"].is_array());
}

#[tokio::test]
async fn test_missing_lesson_is_404() {
    let setup = setup().await;
    let (status, body) = send(
        &setup.app,
        get("/api/lessons/no-such-lesson", &setup.student_token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lesson not found.");
}

#[tokio::test]
async fn test_lesson_listing_and_search() {
    let setup = setup().await;
    create_lesson(&setup, "Rust ownership").await;
    create_lesson(&setup, "Python basics").await;

    let (status, body) = send(&setup.app, get("/api/lessons", &setup.student_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(
        &setup.app,
        get("/api/lessons?search=Rust", &setup.student_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Rust ownership");
}

#[tokio::test]
async fn test_student_saves_question_and_reads_it_back() {
    let setup = setup().await;
    let lesson_id = create_lesson(&setup, "Ownership").await;

    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/questions",
            &json!({
                "lesson_id": lesson_id,
                "question": "What is a move?",
                "answer": "Transfer of ownership."
            }),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Q&A saved");
    assert_eq!(body["question"]["question"], "What is a move?");

    let (status, body) = send(
        &setup.app,
        get(
            &format!("/api/lessons/{lesson_id}/questions"),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_question_against_missing_lesson_is_404() {
    let setup = setup().await;
    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/questions",
            &json!({
                "lesson_id": "no-such-lesson",
                "question": "Anyone there?",
                "answer": ""
            }),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Lesson not found.");
}

#[tokio::test]
async fn test_ai_answer_stores_question_with_reply() {
    let setup = setup().await;
    let lesson_id = create_lesson(&setup, "Closures").await;

    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/ai/answer",
            &json!({ "lesson_id": lesson_id, "question": "What is a closure?" }),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "AI answer generated and saved");
    assert_eq!(body["data"]["answer"], common::STUB_ANSWER);
    assert_eq!(body["data"]["question"], "What is a closure?");

    // The Q&A pair is persisted and visible in history
    let (status, body) = send(
        &setup.app,
        get(&format!("/api/ai/history/{lesson_id}"), &setup.student_token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["answer"], common::STUB_ANSWER);
}

#[tokio::test]
async fn test_recommendations_rank_matching_lessons() {
    let setup = setup().await;
    create_lesson(&setup, "Rust ownership in depth").await;
    create_lesson(&setup, "Watercolor painting").await;

    let (status, body) = send(
        &setup.app,
        post_json(
            "/api/ai/recommend",
            &json!({ "question": "Rust ownership" }),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let recs = body["recommendations"].as_array().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0]["title"], "Rust ownership in depth");
}

#[tokio::test]
async fn test_ai_history_honors_per_page() {
    let setup = setup().await;
    let lesson_id = create_lesson(&setup, "Iterators").await;

    for i in 0..3 {
        let (status, _) = send(
            &setup.app,
            post_json(
                "/api/questions",
                &json!({
                    "lesson_id": lesson_id,
                    "question": format!("Question {i}?"),
                    "answer": "An answer."
                }),
                &setup.student_token,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(
        &setup.app,
        get(
            &format!("/api/ai/history/{lesson_id}?per_page=2"),
            &setup.student_token,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["per_page"], 2);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}
