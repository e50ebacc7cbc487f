// ABOUTME: Application constants shared across modules
// ABOUTME: Ability names, limits, environment variable names, and user-facing messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Token ability names checked by the capability gate
pub mod abilities {
    /// Grants every ability
    pub const WILDCARD: &str = "*";
    /// Read lesson content and Q&A history
    pub const LESSON_READ: &str = "lesson:read";
    /// Upload new lessons
    pub const LESSON_CREATE: &str = "lesson:create";
    /// Submit questions and AI answers
    pub const QUESTION_CREATE: &str = "question:create";
}

/// Limits and defaults for the session core and request validation
pub mod limits {
    /// Session lifetime measured from token creation
    pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
    /// Live tokens allowed per account
    pub const DEFAULT_MAX_SESSIONS_PER_USER: i64 = 5;
    /// Tokens kept when the cap is hit, before the new one is created
    pub const DEFAULT_SESSION_PRUNE_TO: i64 = 4;
    /// Characters of the token value kept as a lookup prefix
    pub const TOKEN_PREFIX_LEN: usize = 12;
    /// Pagination defaults for listing endpoints
    pub const DEFAULT_PAGE_SIZE: i64 = 10;
    pub const MAX_PAGE_SIZE: i64 = 50;
    /// Maximum length of the lesson search term
    pub const MAX_SEARCH_LEN: usize = 100;
    /// Minimum lesson content length
    pub const MIN_LESSON_CONTENT_LEN: usize = 50;
    /// Maximum lesson title / user name length
    pub const MAX_TITLE_LEN: usize = 255;
    /// Minimum password length at registration
    pub const MIN_PASSWORD_LEN: usize = 8;
    /// Questions embedded in a single-lesson response
    pub const RECENT_QUESTIONS_LIMIT: i64 = 5;
    /// Recommendations returned per query
    pub const MAX_RECOMMENDATIONS: usize = 5;
    /// Minimum relevance score for a lesson to be recommended
    pub const MIN_RECOMMENDATION_SCORE: f64 = 30.0;
}

/// Environment variable names for configuration
pub mod env_config {
    pub const HTTP_PORT: &str = "HTTP_PORT";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const SESSION_TTL_HOURS: &str = "SESSION_TTL_HOURS";
    pub const MAX_SESSIONS_PER_USER: &str = "MAX_SESSIONS_PER_USER";
    pub const SESSION_PRUNE_TO: &str = "SESSION_PRUNE_TO";
    pub const FRONTEND_URL: &str = "FRONTEND_URL";
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const LLM_BASE_URL: &str = "LLM_BASE_URL";
    pub const LLM_MODEL: &str = "LLM_MODEL";
}

/// Token value prefixes for identification in logs and support tooling
pub mod key_prefixes {
    /// Session tokens issued at login
    pub const SESSION: &str = "tut_";
}

/// User-facing messages for the authentication and authorization chain
pub mod error_messages {
    pub const NO_TOKEN: &str = "No token provided";
    pub const INVALID_TOKEN: &str = "Invalid token";
    pub const TOKEN_EXPIRED: &str = "Token has expired";
    pub const PERMISSION_DENIED: &str =
        "You do not have the required permissions for this action.";
    pub const INVALID_CREDENTIALS: &str = "The provided credentials are incorrect.";
    pub const AUTHENTICATION_FAILED: &str = "Authentication failed";
    pub const VALIDATION_FAILED: &str = "Validation failed";
    pub const LOGOUT_SUCCESS: &str = "Successfully logged out";
    pub const LESSON_NOT_FOUND: &str = "Lesson not found.";
}

/// Service identifiers for logging
pub mod service_names {
    pub const TUTORHUB_SERVER: &str = "tutorhub-server";
}
