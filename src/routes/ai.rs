// ABOUTME: AI route handlers for generated answers and lesson recommendations
// ABOUTME: Delegates to the chat provider and the lexical recommendation scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::abilities::require_ability;
use crate::constants::{abilities, error_messages, limits};
use crate::context::ServerResources;
use crate::database_plugins::DatabaseProvider;
use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest};
use crate::models::lesson::AskQuestionRequest;
use crate::models::Question;
use crate::recommendation;

/// Generated answers are kept short
const ANSWER_MAX_TOKENS: u32 = 150;
const ANSWER_TEMPERATURE: f32 = 0.7;

const TUTOR_PROMPT: &str = "You are a helpful teaching assistant. \
    Answer questions about the lesson content clearly and concisely.";

/// Recommendation payload
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub question: String,
}

/// History query parameters
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub per_page: Option<i64>,
    pub page: Option<i64>,
}

/// AI routes
pub struct AiRoutes;

impl AiRoutes {
    /// Create all AI routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/ai/answer", post(Self::handle_answer))
            .route("/api/ai/recommend", post(Self::handle_recommend))
            .route("/api/ai/history/:lesson_id", get(Self::handle_history))
            .with_state(resources)
    }

    async fn handle_answer(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<AskQuestionRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::QUESTION_CREATE)?;

        if request.question.trim().is_empty() {
            return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!({ "question": ["The question field is required."] })));
        }

        let Some(lesson) = resources
            .database
            .get_lesson(&request.lesson_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        else {
            return Err(AppError::not_found(error_messages::LESSON_NOT_FOUND));
        };

        let chat_request = ChatRequest::new(
            vec![
                ChatMessage::system(TUTOR_PROMPT),
                ChatMessage::user(format!(
                    "Lesson: {}\n\nQuestion: {}",
                    lesson.content, request.question
                )),
            ],
            ANSWER_MAX_TOKENS,
            ANSWER_TEMPERATURE,
        );
        let answer = resources.chat_provider.complete(&chat_request).await?;

        let question = Question::new(
            lesson.id.clone(),
            auth.user.id,
            request.question,
            answer.content.trim().to_owned(),
        );
        resources
            .database
            .create_question(&question)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(question_id = %question.id, lesson_id = %lesson.id, "AI answer stored");
        let body = json!({
            "message": "AI answer generated and saved",
            "data": question,
        });
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn handle_recommend(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<RecommendRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::LESSON_READ)?;

        if request.question.trim().is_empty() {
            return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!({ "question": ["The question field is required."] })));
        }

        let lessons = resources
            .database
            .list_lessons(None, -1, 0)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let recommendations: Vec<_> = recommendation::recommend(&request.question, lessons)
            .into_iter()
            .map(|scored| scored.lesson)
            .collect();

        Ok((StatusCode::OK, Json(json!({ "recommendations": recommendations }))).into_response())
    }

    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(lesson_id): Path<String>,
        Query(query): Query<HistoryQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::LESSON_READ)?;

        if resources
            .database
            .get_lesson(&lesson_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::not_found(error_messages::LESSON_NOT_FOUND));
        }

        let per_page = query
            .per_page
            .unwrap_or(limits::DEFAULT_PAGE_SIZE)
            .clamp(1, limits::MAX_PAGE_SIZE);
        let questions = resources
            .database
            .list_questions(&lesson_id, per_page)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let body = json!({
            "data": questions,
            "per_page": per_page,
        });
        Ok((StatusCode::OK, Json(body)).into_response())
    }
}
