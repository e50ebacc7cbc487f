// ABOUTME: Session token issuance, validation, expiry, and revocation
// ABOUTME: Opaque bearer tokens with a per-account concurrent-session cap
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Session Manager
//!
//! Issues and validates the opaque bearer tokens that authenticate every
//! protected request. The raw value is returned exactly once, at issuance;
//! storage keeps only a SHA-256 digest plus a short lookup prefix. Expiry
//! is lazy: an expired token is detected and deleted at validation time,
//! there is no background sweeper.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::abilities::abilities_for;
use crate::config::AuthConfig;
use crate::constants::{key_prefixes, limits};
use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{SessionToken, User};

/// Outcome of presenting a raw token value
///
/// Expired and unknown tokens are distinct outcomes, not errors: both are
/// expected states of the store and each maps to its own client message.
#[derive(Debug)]
pub enum TokenValidation {
    /// Token is live; carries the stored record and its owner
    Valid {
        token: SessionToken,
        user: User,
    },
    /// Token existed but is past its lifetime; it has been deleted
    Expired,
    /// No stored token matches the presented value
    NotFound,
}

/// A freshly issued token: the stored record plus the raw value
///
/// The raw value exists only here. Once this struct is dropped the server
/// can no longer reproduce it.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: SessionToken,
    pub plaintext: String,
}

/// Manages the session token lifecycle against the injected store
#[derive(Clone)]
pub struct SessionManager {
    database: Database,
    config: AuthConfig,
    // Serializes count/prune/insert per account so concurrent logins
    // cannot overshoot the session cap
    issue_locks: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl SessionManager {
    #[must_use]
    pub fn new(database: Database, config: AuthConfig) -> Self {
        Self {
            database,
            config,
            issue_locks: Arc::new(DashMap::new()),
        }
    }

    /// Generate a raw token value: prefix plus 256 bits of randomness
    fn generate_token_value() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        format!("{}{}", key_prefixes::SESSION, URL_SAFE_NO_PAD.encode(bytes))
    }

    /// SHA-256 hex digest of a raw token value
    #[must_use]
    pub fn hash_token(raw: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn lock_for(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        self.issue_locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Issue a new session token for the user
    ///
    /// Enforces the per-account cap: when the account already holds the
    /// maximum number of live tokens, the oldest are deleted first so the
    /// new token brings the count back to the cap, never above it.
    ///
    /// # Errors
    ///
    /// Returns a database error if the store rejects the write
    pub async fn issue(&self, user: &User) -> AppResult<IssuedToken> {
        let lock = self.lock_for(user.id);
        let _guard = lock.lock().await;

        let live = self
            .database
            .count_session_tokens(user.id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        if live >= self.config.max_sessions_per_user {
            let pruned = self
                .database
                .prune_session_tokens(user.id, self.config.session_prune_to)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            tracing::debug!(
                user_id = %user.id,
                pruned,
                "session cap reached, oldest tokens removed"
            );
        }

        let plaintext = Self::generate_token_value();
        let token = SessionToken {
            id: Uuid::new_v4().to_string(),
            user_id: user.id,
            token_hash: Self::hash_token(&plaintext),
            token_prefix: plaintext
                .chars()
                .take(limits::TOKEN_PREFIX_LEN)
                .collect(),
            abilities: abilities_for(user.role),
            created_at: Utc::now(),
            last_used_at: None,
        };

        self.database
            .insert_session_token(&token)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!(user_id = %user.id, token_id = %token.id, "session token issued");
        Ok(IssuedToken { token, plaintext })
    }

    /// Validate a raw token value presented by a client
    ///
    /// An expired token is deleted before `Expired` is returned, so a
    /// second presentation of the same value yields `NotFound`. A live
    /// token has its last-used timestamp touched.
    ///
    /// # Errors
    ///
    /// Returns a database error if the store lookup fails
    pub async fn validate(&self, raw: &str) -> AppResult<TokenValidation> {
        let prefix: String = raw.chars().take(limits::TOKEN_PREFIX_LEN).collect();
        let hash = Self::hash_token(raw);

        let Some(token) = self
            .database
            .get_session_token(&prefix, &hash)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        else {
            return Ok(TokenValidation::NotFound);
        };

        if token.is_expired_at(Utc::now(), self.config.session_ttl_hours) {
            self.database
                .delete_session_token(&token.id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            tracing::debug!(token_id = %token.id, "expired session token removed");
            return Ok(TokenValidation::Expired);
        }

        let now = Utc::now();
        self.database
            .update_session_token_last_used(&token.id, now)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let Some(user) = self
            .database
            .get_user(token.user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        else {
            // Account deleted out from under its tokens
            self.database
                .delete_session_token(&token.id)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;
            return Ok(TokenValidation::NotFound);
        };

        let token = SessionToken {
            last_used_at: Some(now),
            ..token
        };
        Ok(TokenValidation::Valid { token, user })
    }

    /// Delete every session token held by the account
    ///
    /// # Errors
    ///
    /// Returns a database error if the store rejects the delete
    pub async fn revoke_all(&self, user_id: Uuid) -> AppResult<u64> {
        let revoked = self
            .database
            .delete_user_session_tokens(user_id)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;
        tracing::info!(user_id = %user_id, revoked, "all session tokens revoked");
        Ok(revoked)
    }
}
