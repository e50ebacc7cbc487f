// ABOUTME: Shared test helpers
// ABOUTME: In-memory server resources, stub chat provider, and user fixtures
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;

use tutorhub::config::ServerConfig;
use tutorhub::context::ServerResources;
use tutorhub::database_plugins::factory::Database;
use tutorhub::database_plugins::memory::MemoryDatabase;
use tutorhub::database_plugins::DatabaseProvider;
use tutorhub::errors::AppResult;
use tutorhub::llm::{ChatRequest, ChatResponse, LlmProvider};
use tutorhub::models::{User, UserRole};

pub const STUB_ANSWER: &str = "A closure captures variables from its enclosing scope.";

/// Chat provider returning a canned reply
pub struct StubChatProvider;

#[async_trait]
impl LlmProvider for StubChatProvider {
    async fn complete(&self, _request: &ChatRequest) -> AppResult<ChatResponse> {
        Ok(ChatResponse {
            content: STUB_ANSWER.into(),
        })
    }
}

/// Build server resources over the in-memory backend
pub async fn test_resources() -> Arc<ServerResources> {
    let database = Database::Memory(MemoryDatabase::new());
    database.migrate().await.expect("migrate should succeed");
    let config = ServerConfig::default();
    Arc::new(ServerResources::new(
        database,
        config,
        Arc::new(StubChatProvider),
    ))
}

/// Create a user directly in the store; low bcrypt cost keeps tests fast
pub async fn create_user(
    resources: &ServerResources,
    name: &str,
    email: &str,
    password: &str,
    role: UserRole,
) -> User {
    let hash = bcrypt::hash(password, 4).expect("bcrypt hash should succeed");
    let user = User::new(name.into(), email.into(), hash, role);
    resources
        .database
        .create_user(&user)
        .await
        .expect("create_user should succeed");
    user
}

pub async fn create_student(resources: &ServerResources, email: &str, password: &str) -> User {
    create_user(resources, "Student", email, password, UserRole::Student).await
}

pub async fn create_admin(resources: &ServerResources, email: &str, password: &str) -> User {
    create_user(resources, "Admin", email, password, UserRole::Admin).await
}
