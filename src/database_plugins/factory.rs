// ABOUTME: Database factory and provider dispatch for multi-backend support
// ABOUTME: Unified interface over SQLite and in-memory with runtime selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database factory for creating database providers
//!
//! Selects a backend from the configured [`DatabaseUrl`] and delegates
//! every provider operation to it.

use super::memory::MemoryDatabase;
use super::sqlite::SqliteDatabase;
use super::DatabaseProvider;
use crate::config::DatabaseUrl;
use crate::models::{Lesson, Question, SessionToken, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

/// Database instance wrapper that delegates to the appropriate implementation
#[derive(Clone)]
pub enum Database {
    Sqlite(SqliteDatabase),
    Memory(MemoryDatabase),
}

impl Database {
    /// Get a descriptive string for the current database backend
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLite (file-backed)",
            Self::Memory(_) => "In-memory (ephemeral)",
        }
    }

    /// Create a new database instance for the configured target
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to connect
    pub async fn new(url: &DatabaseUrl) -> Result<Self> {
        if url.is_memory() {
            info!("Initializing in-memory database");
            return Ok(Self::Memory(MemoryDatabase::new()));
        }
        info!(url = %url.to_connection_string(), "Initializing SQLite database");
        let db = SqliteDatabase::new(&url.to_connection_string()).await?;
        Ok(Self::Sqlite(db))
    }
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn migrate(&self) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.migrate().await,
            Self::Memory(db) => db.migrate().await,
        }
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        match self {
            Self::Sqlite(db) => db.create_user(user).await,
            Self::Memory(db) => db.create_user(user).await,
        }
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        match self {
            Self::Sqlite(db) => db.get_user(user_id).await,
            Self::Memory(db) => db.get_user(user_id).await,
        }
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        match self {
            Self::Sqlite(db) => db.get_user_by_email(email).await,
            Self::Memory(db) => db.get_user_by_email(email).await,
        }
    }

    async fn insert_session_token(&self, token: &SessionToken) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.insert_session_token(token).await,
            Self::Memory(db) => db.insert_session_token(token).await,
        }
    }

    async fn get_session_token(&self, prefix: &str, hash: &str) -> Result<Option<SessionToken>> {
        match self {
            Self::Sqlite(db) => db.get_session_token(prefix, hash).await,
            Self::Memory(db) => db.get_session_token(prefix, hash).await,
        }
    }

    async fn count_session_tokens(&self, user_id: Uuid) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.count_session_tokens(user_id).await,
            Self::Memory(db) => db.count_session_tokens(user_id).await,
        }
    }

    async fn prune_session_tokens(&self, user_id: Uuid, keep: i64) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.prune_session_tokens(user_id, keep).await,
            Self::Memory(db) => db.prune_session_tokens(user_id, keep).await,
        }
    }

    async fn delete_session_token(&self, token_id: &str) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.delete_session_token(token_id).await,
            Self::Memory(db) => db.delete_session_token(token_id).await,
        }
    }

    async fn delete_user_session_tokens(&self, user_id: Uuid) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.delete_user_session_tokens(user_id).await,
            Self::Memory(db) => db.delete_user_session_tokens(user_id).await,
        }
    }

    async fn update_session_token_last_used(
        &self,
        token_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.update_session_token_last_used(token_id, timestamp).await,
            Self::Memory(db) => db.update_session_token_last_used(token_id, timestamp).await,
        }
    }

    async fn create_lesson(&self, lesson: &Lesson) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.create_lesson(lesson).await,
            Self::Memory(db) => db.create_lesson(lesson).await,
        }
    }

    async fn get_lesson(&self, lesson_id: &str) -> Result<Option<Lesson>> {
        match self {
            Self::Sqlite(db) => db.get_lesson(lesson_id).await,
            Self::Memory(db) => db.get_lesson(lesson_id).await,
        }
    }

    async fn get_lesson_by_title(&self, title: &str) -> Result<Option<Lesson>> {
        match self {
            Self::Sqlite(db) => db.get_lesson_by_title(title).await,
            Self::Memory(db) => db.get_lesson_by_title(title).await,
        }
    }

    async fn list_lessons(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>> {
        match self {
            Self::Sqlite(db) => db.list_lessons(search, limit, offset).await,
            Self::Memory(db) => db.list_lessons(search, limit, offset).await,
        }
    }

    async fn create_question(&self, question: &Question) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.create_question(question).await,
            Self::Memory(db) => db.create_question(question).await,
        }
    }

    async fn list_questions(&self, lesson_id: &str, limit: i64) -> Result<Vec<Question>> {
        match self {
            Self::Sqlite(db) => db.list_questions(lesson_id, limit).await,
            Self::Memory(db) => db.list_questions(lesson_id, limit).await,
        }
    }
}
