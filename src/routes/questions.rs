// ABOUTME: Question route handlers for submitting and listing Q&A pairs
// ABOUTME: Submission is gated on question:create, listing on lesson:read
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::info;

use crate::abilities::require_ability;
use crate::constants::{abilities, error_messages};
use crate::context::ServerResources;
use crate::database_plugins::DatabaseProvider;
use crate::errors::AppError;
use crate::models::lesson::CreateQuestionRequest;
use crate::models::Question;

/// Question routes
pub struct QuestionRoutes;

impl QuestionRoutes {
    /// Create all question routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/questions", post(Self::handle_create_question))
            .route(
                "/api/lessons/:lesson_id/questions",
                get(Self::handle_list_questions),
            )
            .with_state(resources)
    }

    async fn handle_create_question(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateQuestionRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::QUESTION_CREATE)?;

        if request.question.trim().is_empty() {
            return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!({ "question": ["The question field is required."] })));
        }

        if resources
            .database
            .get_lesson(&request.lesson_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_none()
        {
            return Err(AppError::not_found(error_messages::LESSON_NOT_FOUND));
        }

        let question = Question::new(
            request.lesson_id,
            auth.user.id,
            request.question,
            request.answer,
        );
        resources
            .database
            .create_question(&question)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(question_id = %question.id, user_id = %auth.user.id, "question saved");
        let body = json!({
            "message": "Q&A saved",
            "question": question,
        });
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn handle_list_questions(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(lesson_id): Path<String>,
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

        let questions = resources
            .database
            .list_questions(&lesson_id, -1)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        Ok((StatusCode::OK, Json(json!({ "data": questions }))).into_response())
    }
}
