// ABOUTME: Shared server state handed to every router
// ABOUTME: Bundles the store, session manager, auth middleware, and providers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared server resources
//!
//! Constructed once at startup and passed to routers as `Arc<ServerResources>`,
//! so every handler sees the same store, session manager, and provider.

use std::sync::Arc;

use crate::auth::SessionManager;
use crate::config::ServerConfig;
use crate::database_plugins::factory::Database;
use crate::llm::LlmProvider;
use crate::middleware::TokenAuthMiddleware;

/// Everything a request handler needs, shared across the server
pub struct ServerResources {
    /// Storage backend
    pub database: Database,
    /// Session token lifecycle manager
    pub session_manager: Arc<SessionManager>,
    /// Bearer-token authentication
    pub auth_middleware: TokenAuthMiddleware,
    /// Chat-completion provider for AI answers
    pub chat_provider: Arc<dyn LlmProvider>,
    /// Server configuration
    pub config: ServerConfig,
}

impl ServerResources {
    #[must_use]
    pub fn new(
        database: Database,
        config: ServerConfig,
        chat_provider: Arc<dyn LlmProvider>,
    ) -> Self {
        let session_manager = Arc::new(SessionManager::new(
            database.clone(),
            config.auth.clone(),
        ));
        let auth_middleware = TokenAuthMiddleware::new(session_manager.clone());
        Self {
            database,
            session_manager,
            auth_middleware,
            chat_provider,
            config,
        }
    }
}
