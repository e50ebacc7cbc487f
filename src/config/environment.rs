// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables and runtime configuration parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment-based configuration management for production deployment

use crate::constants::{env_config, limits};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "error" => Self::Error,
            "warn" => Self::Warn,
            "debug" => Self::Debug,
            "trace" => Self::Trace,
            _ => Self::Info,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warn => write!(f, "warn"),
            Self::Info => write!(f, "info"),
            Self::Debug => write!(f, "debug"),
            Self::Trace => write!(f, "trace"),
        }
    }
}

/// Type-safe database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DatabaseUrl {
    /// SQLite database with file path
    SQLite { path: PathBuf },
    /// In-memory store (for tests and ephemeral runs)
    Memory,
}

impl DatabaseUrl {
    /// Parse from string with validation
    pub fn parse_url(s: &str) -> Result<Self> {
        if s == "memory" || s == ":memory:" || s == "sqlite::memory:" {
            return Ok(Self::Memory);
        }
        if let Some(path_str) = s.strip_prefix("sqlite:") {
            if path_str == ":memory:" {
                Ok(Self::Memory)
            } else {
                Ok(Self::SQLite {
                    path: PathBuf::from(path_str),
                })
            }
        } else {
            // Fallback: treat as SQLite file path
            Ok(Self::SQLite {
                path: PathBuf::from(s),
            })
        }
    }

    /// Convert to connection string
    #[must_use]
    pub fn to_connection_string(&self) -> String {
        match self {
            Self::SQLite { path } => format!("sqlite:{}", path.display()),
            Self::Memory => "sqlite::memory:".to_owned(),
        }
    }

    /// Check if this is an in-memory store
    #[must_use]
    pub const fn is_memory(&self) -> bool {
        matches!(self, Self::Memory)
    }
}

impl Default for DatabaseUrl {
    fn default() -> Self {
        Self::SQLite {
            path: PathBuf::from("./data/tutorhub.db"),
        }
    }
}

/// Session-core tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Token lifetime in hours, measured from creation
    pub session_ttl_hours: i64,
    /// Live tokens allowed per account
    pub max_sessions_per_user: i64,
    /// Tokens kept when the cap is hit, before the new token is created
    pub session_prune_to: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_hours: limits::DEFAULT_SESSION_TTL_HOURS,
            max_sessions_per_user: limits::DEFAULT_MAX_SESSIONS_PER_USER,
            session_prune_to: limits::DEFAULT_SESSION_PRUNE_TO,
        }
    }
}

/// CORS configuration for the response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origin, taken from `FRONTEND_URL`
    pub frontend_origin: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            frontend_origin: "http://localhost:3000".to_owned(),
        }
    }
}

/// Chat-completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key; answers fail with a provider error when absent
    pub api_key: Option<String>,
    /// Base URL of an OpenAI-compatible API
    pub base_url: String,
    /// Model identifier sent with each completion request
    pub model: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_owned(),
            model: "gpt-3.5-turbo".to_owned(),
        }
    }
}

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port to listen on
    pub http_port: u16,
    /// Database connection target
    pub database_url: DatabaseUrl,
    /// Session issuance and expiry settings
    pub auth: AuthConfig,
    /// CORS settings for the envelope layer
    pub cors: CorsConfig,
    /// Chat-completion provider settings
    pub llm: LlmConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            database_url: DatabaseUrl::default(),
            auth: AuthConfig::default(),
            cors: CorsConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse
    pub fn from_env() -> Result<Self> {
        let http_port = parse_env_or(env_config::HTTP_PORT, 8080_u16)?;

        let database_url = match env::var(env_config::DATABASE_URL) {
            Ok(url) => DatabaseUrl::parse_url(&url)
                .with_context(|| format!("invalid {}", env_config::DATABASE_URL))?,
            Err(_) => DatabaseUrl::default(),
        };

        let auth = AuthConfig {
            session_ttl_hours: parse_env_or(
                env_config::SESSION_TTL_HOURS,
                limits::DEFAULT_SESSION_TTL_HOURS,
            )?,
            max_sessions_per_user: parse_env_or(
                env_config::MAX_SESSIONS_PER_USER,
                limits::DEFAULT_MAX_SESSIONS_PER_USER,
            )?,
            session_prune_to: parse_env_or(
                env_config::SESSION_PRUNE_TO,
                limits::DEFAULT_SESSION_PRUNE_TO,
            )?,
        };
        anyhow::ensure!(
            auth.session_ttl_hours > 0,
            "{} must be positive",
            env_config::SESSION_TTL_HOURS
        );
        anyhow::ensure!(
            auth.max_sessions_per_user > 0,
            "{} must be positive",
            env_config::MAX_SESSIONS_PER_USER
        );
        anyhow::ensure!(
            auth.session_prune_to < auth.max_sessions_per_user,
            "{} must leave room for the new token under {}",
            env_config::SESSION_PRUNE_TO,
            env_config::MAX_SESSIONS_PER_USER
        );

        let cors = CorsConfig {
            frontend_origin: env::var(env_config::FRONTEND_URL)
                .unwrap_or_else(|_| CorsConfig::default().frontend_origin),
        };

        let llm_defaults = LlmConfig::default();
        let llm = LlmConfig {
            api_key: env::var(env_config::OPENAI_API_KEY).ok(),
            base_url: env::var(env_config::LLM_BASE_URL).unwrap_or(llm_defaults.base_url),
            model: env::var(env_config::LLM_MODEL).unwrap_or(llm_defaults.model),
        };
        if llm.api_key.is_none() {
            warn!("{} not set, AI answers will be unavailable", env_config::OPENAI_API_KEY);
        }

        Ok(Self {
            http_port,
            database_url,
            auth,
            cors,
            llm,
        })
    }
}

fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_url_parsing() {
        assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
        assert!(DatabaseUrl::parse_url("memory").unwrap().is_memory());

        let file = DatabaseUrl::parse_url("sqlite:./data/app.db").unwrap();
        assert_eq!(file.to_connection_string(), "sqlite:./data/app.db");

        // Bare paths fall back to sqlite files
        let bare = DatabaseUrl::parse_url("./app.db").unwrap();
        assert!(!bare.is_memory());
    }

    #[test]
    fn test_auth_config_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.session_ttl_hours, 24);
        assert_eq!(auth.max_sessions_per_user, 5);
        assert_eq!(auth.session_prune_to, 4);
        assert!(auth.session_prune_to < auth.max_sessions_per_user);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str_or_default("DEBUG"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str_or_default("bogus"), LogLevel::Info);
    }
}
