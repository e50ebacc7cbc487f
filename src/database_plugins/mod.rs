// ABOUTME: Database abstraction layer for the Tutorhub server
// ABOUTME: Plugin architecture with SQLite and in-memory backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::models::{Lesson, Question, SessionToken, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod factory;
pub mod memory;
pub mod sqlite;

/// Core database abstraction trait
///
/// All database implementations must implement this trait to provide
/// a consistent interface for the application layer.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Run database migrations to set up schema
    async fn migrate(&self) -> Result<()>;

    // ================================
    // User Management
    // ================================

    /// Create a new user account
    async fn create_user(&self, user: &User) -> Result<Uuid>;

    /// Get user by ID
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>>;

    /// Get user by email address
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    // ================================
    // Session Tokens
    // ================================

    /// Persist a newly issued session token
    async fn insert_session_token(&self, token: &SessionToken) -> Result<()>;

    /// Look up a stored token by value prefix and digest
    async fn get_session_token(&self, prefix: &str, hash: &str) -> Result<Option<SessionToken>>;

    /// Number of stored tokens held by the account
    async fn count_session_tokens(&self, user_id: Uuid) -> Result<i64>;

    /// Delete the account's oldest tokens so at most `keep` remain;
    /// returns how many were deleted
    async fn prune_session_tokens(&self, user_id: Uuid, keep: i64) -> Result<u64>;

    /// Delete a single token by identifier
    async fn delete_session_token(&self, token_id: &str) -> Result<()>;

    /// Delete every token held by the account; returns how many were deleted
    async fn delete_user_session_tokens(&self, user_id: Uuid) -> Result<u64>;

    /// Record a successful validation of the token
    async fn update_session_token_last_used(
        &self,
        token_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()>;

    // ================================
    // Lessons
    // ================================

    /// Store a new lesson
    async fn create_lesson(&self, lesson: &Lesson) -> Result<()>;

    /// Get lesson by ID
    async fn get_lesson(&self, lesson_id: &str) -> Result<Option<Lesson>>;

    /// Get lesson by its unique title
    async fn get_lesson_by_title(&self, title: &str) -> Result<Option<Lesson>>;

    /// List lessons newest first, optionally filtered by a title/content
    /// substring; a negative `limit` returns everything
    async fn list_lessons(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>>;

    // ================================
    // Questions
    // ================================

    /// Store a question together with its answer
    async fn create_question(&self, question: &Question) -> Result<()>;

    /// List a lesson's questions newest first, capped at `limit`
    async fn list_questions(&self, lesson_id: &str, limit: i64) -> Result<Vec<Question>>;
}
