// ABOUTME: Bearer-token authentication middleware
// ABOUTME: Extracts, validates, and maps tokens to the owning user
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request authentication
//!
//! Every protected handler calls into this middleware with the request
//! headers. The three failure modes are distinct on the wire: a missing
//! credential, an unknown token, and an expired token each carry their
//! own message, all under HTTP 401.

use std::sync::Arc;

use axum::http::{header, HeaderMap};
use tracing::debug;

use crate::auth::{SessionManager, TokenValidation};
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::{SessionToken, User};

/// Outcome of a successful authentication
#[derive(Debug)]
pub struct AuthResult {
    /// The authenticated account
    pub user: User,
    /// The validated token, carrying its ability set
    pub token: SessionToken,
}

/// Authenticates bearer tokens against the session manager
#[derive(Clone)]
pub struct TokenAuthMiddleware {
    session_manager: Arc<SessionManager>,
}

impl TokenAuthMiddleware {
    #[must_use]
    pub fn new(session_manager: Arc<SessionManager>) -> Self {
        Self { session_manager }
    }

    /// Authenticate an `Authorization` header value
    ///
    /// # Errors
    ///
    /// Returns 401 errors for missing, unknown, or expired tokens
    pub async fn authenticate_request(&self, auth_header: Option<&str>) -> AppResult<AuthResult> {
        let Some(raw) = auth_header.and_then(|h| h.strip_prefix("Bearer ")) else {
            debug!("request rejected, no bearer credential presented");
            return Err(AppError::auth_required());
        };

        match self.session_manager.validate(raw).await? {
            TokenValidation::Valid { token, user } => {
                debug!(user_id = %user.id, token_id = %token.id, "request authenticated");
                Ok(AuthResult { user, token })
            }
            TokenValidation::Expired => {
                debug!("request rejected, token expired");
                Err(AppError::auth_expired())
            }
            TokenValidation::NotFound => {
                debug!("request rejected, token unknown");
                Err(AppError::auth_invalid(error_messages::INVALID_TOKEN))
            }
        }
    }

    /// Authenticate a full header map
    ///
    /// # Errors
    ///
    /// Returns 401 errors for missing, unknown, or expired tokens
    pub async fn authenticate_headers(&self, headers: &HeaderMap) -> AppResult<AuthResult> {
        let auth_header = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        self.authenticate_request(auth_header).await
    }
}
