// ABOUTME: In-memory database implementation for tests and ephemeral runs
// ABOUTME: HashMap-backed provider with the same semantics as the SQLite backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::DatabaseProvider;
use crate::models::{Lesson, Question, SessionToken, User};

#[derive(Default)]
struct Inner {
    users: HashMap<Uuid, User>,
    // Keyed by token hash; the digest is unique per token
    tokens: HashMap<String, SessionToken>,
    lessons: HashMap<String, Lesson>,
    questions: HashMap<String, Question>,
}

/// In-memory database provider
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryDatabase {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DatabaseProvider for MemoryDatabase {
    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    async fn create_user(&self, user: &User) -> Result<Uuid> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            bail!("UNIQUE constraint failed: users.email");
        }
        inner.users.insert(user.id, user.clone());
        Ok(user.id)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn insert_session_token(&self, token: &SessionToken) -> Result<()> {
        self.inner
            .write()
            .await
            .tokens
            .insert(token.token_hash.clone(), token.clone());
        Ok(())
    }

    async fn get_session_token(&self, prefix: &str, hash: &str) -> Result<Option<SessionToken>> {
        Ok(self
            .inner
            .read()
            .await
            .tokens
            .get(hash)
            .filter(|t| t.token_prefix == prefix)
            .cloned())
    }

    async fn count_session_tokens(&self, user_id: Uuid) -> Result<i64> {
        let count = self
            .inner
            .read()
            .await
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .count();
        Ok(i64::try_from(count)?)
    }

    async fn prune_session_tokens(&self, user_id: Uuid, keep: i64) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let mut owned: Vec<(String, DateTime<Utc>, String)> = inner
            .tokens
            .values()
            .filter(|t| t.user_id == user_id)
            .map(|t| (t.token_hash.clone(), t.created_at, t.id.clone()))
            .collect();
        // Newest first; ties broken by id to match the SQLite backend
        owned.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.2.cmp(&a.2)));

        let keep = usize::try_from(keep.max(0))?;
        let doomed: Vec<String> = owned.into_iter().skip(keep).map(|(h, _, _)| h).collect();
        for hash in &doomed {
            inner.tokens.remove(hash);
        }
        Ok(doomed.len() as u64)
    }

    async fn delete_session_token(&self, token_id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.tokens.retain(|_, t| t.id != token_id);
        Ok(())
    }

    async fn delete_user_session_tokens(&self, user_id: Uuid) -> Result<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.tokens.len();
        inner.tokens.retain(|_, t| t.user_id != user_id);
        Ok((before - inner.tokens.len()) as u64)
    }

    async fn update_session_token_last_used(
        &self,
        token_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(token) = inner.tokens.values_mut().find(|t| t.id == token_id) {
            token.last_used_at = Some(timestamp);
        }
        Ok(())
    }

    async fn create_lesson(&self, lesson: &Lesson) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.lessons.values().any(|l| l.title == lesson.title) {
            bail!("UNIQUE constraint failed: lessons.title");
        }
        inner.lessons.insert(lesson.id.clone(), lesson.clone());
        Ok(())
    }

    async fn get_lesson(&self, lesson_id: &str) -> Result<Option<Lesson>> {
        Ok(self.inner.read().await.lessons.get(lesson_id).cloned())
    }

    async fn get_lesson_by_title(&self, title: &str) -> Result<Option<Lesson>> {
        Ok(self
            .inner
            .read()
            .await
            .lessons
            .values()
            .find(|l| l.title == title)
            .cloned())
    }

    async fn list_lessons(
        &self,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>> {
        let inner = self.inner.read().await;
        let needle = search.map(str::to_lowercase);
        let mut matched: Vec<Lesson> = inner
            .lessons
            .values()
            .filter(|l| {
                needle.as_ref().is_none_or(|n| {
                    l.title.to_lowercase().contains(n) || l.content.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = usize::try_from(offset.max(0))?;
        let page: Vec<Lesson> = if limit < 0 {
            matched.into_iter().skip(offset).collect()
        } else {
            matched
                .into_iter()
                .skip(offset)
                .take(usize::try_from(limit)?)
                .collect()
        };
        Ok(page)
    }

    async fn create_question(&self, question: &Question) -> Result<()> {
        self.inner
            .write()
            .await
            .questions
            .insert(question.id.clone(), question.clone());
        Ok(())
    }

    async fn list_questions(&self, lesson_id: &str, limit: i64) -> Result<Vec<Question>> {
        let inner = self.inner.read().await;
        let mut matched: Vec<Question> = inner
            .questions
            .values()
            .filter(|q| q.lesson_id == lesson_id)
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if limit >= 0 {
            matched.truncate(usize::try_from(limit)?);
        }
        Ok(matched)
    }
}
