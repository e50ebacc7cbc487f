// ABOUTME: SQLite database implementation
// ABOUTME: Schema migration and runtime-bound queries over a connection pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use super::DatabaseProvider;
use crate::models::{AbilitySet, Lesson, Question, SessionToken, User, UserRole};

/// SQLite-backed database provider
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect to the given `sqlite:` URL, creating the file if missing
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("invalid sqlite URL: {database_url}"))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to connect to sqlite database")?;

        Ok(Self { pool })
    }

    fn row_to_user(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
        let id: String = row.try_get("id")?;
        let role: String = row.try_get("role")?;
        Ok(User {
            id: Uuid::parse_str(&id).context("invalid user id in database")?,
            name: row.try_get("name")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            role: UserRole::from_str(&role)
                .map_err(|e| anyhow::anyhow!("invalid role in database: {e}"))?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn row_to_token(row: &sqlx::sqlite::SqliteRow) -> Result<SessionToken> {
        let user_id: String = row.try_get("user_id")?;
        let abilities_json: String = row.try_get("abilities")?;
        Ok(SessionToken {
            id: row.try_get("id")?,
            user_id: Uuid::parse_str(&user_id).context("invalid user id in token row")?,
            token_hash: row.try_get("token_hash")?,
            token_prefix: row.try_get("token_prefix")?,
            abilities: serde_json::from_str::<AbilitySet>(&abilities_json)
                .context("invalid abilities in token row")?,
            created_at: row.try_get("created_at")?,
            last_used_at: row.try_get("last_used_at")?,
        })
    }

    fn row_to_lesson(row: &sqlx::sqlite::SqliteRow) -> Result<Lesson> {
        Ok(Lesson {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn row_to_question(row: &sqlx::sqlite::SqliteRow) -> Result<Question> {
        let user_id: String = row.try_get("user_id")?;
        Ok(Question {
            id: row.try_get("id")?,
            lesson_id: row.try_get("lesson_id")?,
            user_id: Uuid::parse_str(&user_id).context("invalid user id in question row")?,
            question: row.try_get("question")?,
            answer: row.try_get("answer")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS session_tokens (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                token_hash TEXT NOT NULL,
                token_prefix TEXT NOT NULL,
                abilities TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                last_used_at TIMESTAMP,
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_session_tokens_lookup
             ON session_tokens(token_prefix, token_hash)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_session_tokens_user
             ON session_tokens(user_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS lessons (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL UNIQUE,
                content TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                lesson_id TEXT NOT NULL,
                user_id TEXT NOT NULL,
                question TEXT NOT NULL,
                answer TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL,
                FOREIGN KEY (lesson_id) REFERENCES lessons(id),
                FOREIGN KEY (user_id) REFERENCES users(id)
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_questions_lesson
             ON questions(lesson_id, created_at)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password_hash, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .context("failed to create user")?;

        Ok(user.id)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn insert_session_token(&self, token: &SessionToken) -> Result<()> {
        sqlx::query(
            "INSERT INTO session_tokens
             (id, user_id, token_hash, token_prefix, abilities, created_at, last_used_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&token.id)
        .bind(token.user_id.to_string())
        .bind(&token.token_hash)
        .bind(&token.token_prefix)
        .bind(serde_json::to_string(&token.abilities)?)
        .bind(token.created_at)
        .bind(token.last_used_at)
        .execute(&self.pool)
        .await
        .context("failed to insert session token")?;

        Ok(())
    }

    async fn get_session_token(&self, prefix: &str, hash: &str) -> Result<Option<SessionToken>> {
        let row = sqlx::query(
            "SELECT * FROM session_tokens WHERE token_prefix = ? AND token_hash = ?",
        )
        .bind(prefix)
        .bind(hash)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_token).transpose()
    }

    async fn count_session_tokens(&self, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM session_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.try_get("count")?)
    }

    async fn prune_session_tokens(&self, user_id: Uuid, keep: i64) -> Result<u64> {
        // Ties on created_at are broken by id so the survivor set is stable
        let result = sqlx::query(
            "DELETE FROM session_tokens
             WHERE user_id = ?
               AND id NOT IN (
                   SELECT id FROM session_tokens
                   WHERE user_id = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               )",
        )
        .bind(user_id.to_string())
        .bind(user_id.to_string())
        .bind(keep)
        .execute(&self.pool)
        .await
        .context("failed to prune session tokens")?;

        Ok(result.rows_affected())
    }

    async fn delete_session_token(&self, token_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM session_tokens WHERE id = ?")
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_user_session_tokens(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn update_session_token_last_used(
        &self,
        token_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("UPDATE session_tokens SET last_used_at = ? WHERE id = ?")
            .bind(timestamp)
            .bind(token_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn create_lesson(&self, lesson: &Lesson) -> Result<()> {
        sqlx::query(
            "INSERT INTO lessons (id, title, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&lesson.id)
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(lesson.created_at)
        .bind(lesson.updated_at)
        .execute(&self.pool)
        .await
        .context("failed to create lesson")?;

        Ok(())
    }

    async fn get_lesson(&self, lesson_id: &str) -> Result<Option<Lesson>> {
        let row = sqlx::query("SELECT * FROM lessons WHERE id = ?")
            .bind(lesson_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_lesson).transpose()
    }

    async fn get_lesson_by_title(&self, title: &str) -> Result<Option<Lesson>> {
        let row = sqlx::query("SELECT * FROM lessons WHERE title = ?")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_lesson).transpose()
    }

    async fn list_lessons(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>> {
        // SQLite treats a negative LIMIT as unlimited
        let rows = if let Some(term) = search {
            sqlx::query(
                "SELECT * FROM lessons
                 WHERE title LIKE '%' || ? || '%' OR content LIKE '%' || ? || '%'
                 ORDER BY created_at DESC
                 LIMIT ? OFFSET ?",
            )
            .bind(term)
            .bind(term)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        } else {
            sqlx::query(
                "SELECT * FROM lessons ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?
        };

        rows.iter().map(Self::row_to_lesson).collect()
    }

    async fn create_question(&self, question: &Question) -> Result<()> {
        sqlx::query(
            "INSERT INTO questions (id, lesson_id, user_id, question, answer, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&question.id)
        .bind(&question.lesson_id)
        .bind(question.user_id.to_string())
        .bind(&question.question)
        .bind(&question.answer)
        .bind(question.created_at)
        .execute(&self.pool)
        .await
        .context("failed to create question")?;

        Ok(())
    }

    async fn list_questions(&self, lesson_id: &str, limit: i64) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            "SELECT * FROM questions WHERE lesson_id = ?
             ORDER BY created_at DESC LIMIT ?",
        )
        .bind(lesson_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_question).collect()
    }
}
