// ABOUTME: Lesson route handlers for upload and browsing
// ABOUTME: Creation is gated on lesson:create, reads on lesson:read
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
use serde_json::json;
use tracing::info;

use crate::abilities::require_ability;
use crate::constants::{abilities, error_messages, limits};
use crate::context::ServerResources;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::lesson::{CreateLessonRequest, ListLessonsQuery};
use crate::models::Lesson;

/// Lesson routes
pub struct LessonRoutes;

impl LessonRoutes {
    /// Create all lesson routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/lessons", post(Self::handle_create_lesson))
            .route("/api/lessons", get(Self::handle_list_lessons))
            .route("/api/lessons/:lesson_id", get(Self::handle_get_lesson))
            .with_state(resources)
    }

    fn validate_lesson(request: &CreateLessonRequest) -> AppResult<()> {
        let mut errors = serde_json::Map::new();

        if request.title.trim().is_empty() {
            errors.insert("title".into(), json!(["The title field is required."]));
        } else if request.title.len() > limits::MAX_TITLE_LEN {
            errors.insert("title".into(), json!(["The title is too long."]));
        }

        if request.content.len() < limits::MIN_LESSON_CONTENT_LEN {
            errors.insert(
                "content".into(),
                json!(["The content must be at least 50 characters."]),
            );
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!(errors)))
        }
    }

    async fn handle_create_lesson(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<CreateLessonRequest>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::LESSON_CREATE)?;

        Self::validate_lesson(&request)?;

        let title = request.title.trim().to_owned();
        if resources
            .database
            .get_lesson_by_title(&title)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_some()
        {
            return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!({ "title": ["The title has already been taken."] })));
        }

        let lesson = Lesson::new(title, request.content);
        resources
            .database
            .create_lesson(&lesson)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        info!(lesson_id = %lesson.id, user_id = %auth.user.id, "lesson created");
        Ok((StatusCode::CREATED, Json(lesson)).into_response())
    }

    async fn handle_list_lessons(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListLessonsQuery>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::LESSON_READ)?;

        if let Some(search) = query.search.as_deref() {
            if search.len() > limits::MAX_SEARCH_LEN {
                return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                    .with_errors(json!({ "search": ["The search term is too long."] })));
            }
        }

        let page = query.page.unwrap_or(1).max(1);
        let per_page = query
            .per_page
            .unwrap_or(limits::DEFAULT_PAGE_SIZE)
            .clamp(1, limits::MAX_PAGE_SIZE);
        let offset = (page - 1) * per_page;

        let lessons = resources
            .database
            .list_lessons(query.search.as_deref(), per_page, offset)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let body = json!({
            "data": lessons,
            "page": page,
            "per_page": per_page,
        });
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    async fn handle_get_lesson(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path(lesson_id): Path<String>,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        require_ability(&auth.token, abilities::LESSON_READ)?;

        let Some(lesson) = resources
            .database
            .get_lesson(&lesson_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        else {
            return Err(AppError::not_found(error_messages::LESSON_NOT_FOUND));
        };

        let recent_questions = resources
            .database
            .list_questions(&lesson.id, limits::RECENT_QUESTIONS_LIMIT)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let body = json!({
            "lesson": lesson,
            "recent_questions": recent_questions,
        });
        Ok((StatusCode::OK, Json(body)).into_response())
    }
}
