// ABOUTME: Authentication route handlers for registration, login, and logout
// ABOUTME: Issues session tokens and exposes the current-user endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication routes
//!
//! Login failures are deliberately indistinguishable: an unknown email and
//! a wrong password produce the same status and body, so the endpoint does
//! not confirm which addresses hold accounts.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::constants::{error_messages, limits};
use crate::context::ServerResources;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{AppError, AppResult};
use crate::models::{User, UserInfo, UserRole};

/// Registration payload
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

/// Login payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful register/login response
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Raw token value; shown exactly once
    pub access_token: String,
    pub token_type: String,
    pub user: UserInfo,
}

/// Authentication routes
pub struct AuthRoutes;

impl AuthRoutes {
    /// Create all authentication routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/register", post(Self::handle_register))
            .route("/api/login", post(Self::handle_login))
            .route("/api/logout", post(Self::handle_logout))
            .route("/api/me", get(Self::handle_me))
            .with_state(resources)
    }

    fn validate_registration(request: &RegisterRequest) -> AppResult<UserRole> {
        let mut errors = serde_json::Map::new();

        if request.name.trim().is_empty() {
            errors.insert("name".into(), json!(["The name field is required."]));
        } else if request.name.len() > limits::MAX_TITLE_LEN {
            errors.insert("name".into(), json!(["The name is too long."]));
        }

        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@')
        {
            errors.insert(
                "email".into(),
                json!(["The email must be a valid email address."]),
            );
        }

        if request.password.len() < limits::MIN_PASSWORD_LEN
            || !request.password.chars().any(|c| c.is_ascii_uppercase())
            || !request.password.chars().any(|c| c.is_ascii_lowercase())
            || !request.password.chars().any(|c| c.is_ascii_digit())
        {
            errors.insert(
                "password".into(),
                json!([
                    "The password must be at least 8 characters and contain an uppercase letter, a lowercase letter, and a number."
                ]),
            );
        }

        let role = match request.role.as_deref() {
            None => UserRole::default(),
            Some(raw) => match UserRole::from_str(raw) {
                Ok(role) => role,
                Err(_) => {
                    errors.insert("role".into(), json!(["The selected role is invalid."]));
                    UserRole::default()
                }
            },
        };

        if errors.is_empty() {
            Ok(role)
        } else {
            Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!(errors)))
        }
    }

    /// Same body for unknown email and wrong password
    fn credentials_error() -> AppError {
        AppError::invalid_input(error_messages::AUTHENTICATION_FAILED)
            .with_errors(json!({ "email": [error_messages::INVALID_CREDENTIALS] }))
    }

    fn request_origin(headers: &HeaderMap) -> String {
        headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_owned()
    }

    async fn hash_password(password: String) -> AppResult<String> {
        tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("password hashing failed: {e}")))
    }

    async fn verify_password(password: String, hash: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| AppError::internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::internal(format!("password verification failed: {e}")))
    }

    async fn handle_register(
        State(resources): State<Arc<ServerResources>>,
        Json(request): Json<RegisterRequest>,
    ) -> Result<Response, AppError> {
        let role = Self::validate_registration(&request)?;

        let email = request.email.trim().to_lowercase();
        if resources
            .database
            .get_user_by_email(&email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
            .is_some()
        {
            return Err(AppError::invalid_input(error_messages::VALIDATION_FAILED)
                .with_errors(json!({ "email": ["The email has already been taken."] })));
        }

        let password_hash = Self::hash_password(request.password).await?;
        let user = User::new(request.name.trim().to_owned(), email, password_hash, role);

        resources
            .database
            .create_user(&user)
            .await
            .map_err(|e| AppError::database(e.to_string()))?;

        let issued = resources.session_manager.issue(&user).await?;
        info!(user_id = %user.id, role = %user.role, "user registered");

        let body = TokenResponse {
            access_token: issued.plaintext,
            token_type: "Bearer".into(),
            user: user.info(),
        };
        Ok((StatusCode::CREATED, Json(body)).into_response())
    }

    async fn handle_login(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Json(request): Json<LoginRequest>,
    ) -> Result<Response, AppError> {
        let email = request.email.trim().to_lowercase();
        let origin = Self::request_origin(&headers);

        let Some(user) = resources
            .database
            .get_user_by_email(&email)
            .await
            .map_err(|e| AppError::database(e.to_string()))?
        else {
            warn!(email = %email, origin = %origin, "login failed, unknown email");
            return Err(Self::credentials_error());
        };

        if !Self::verify_password(request.password, user.password_hash.clone()).await? {
            warn!(email = %email, origin = %origin, "login failed, wrong password");
            return Err(Self::credentials_error());
        }

        let issued = resources.session_manager.issue(&user).await?;
        info!(user_id = %user.id, origin = %origin, "login succeeded");

        let body = TokenResponse {
            access_token: issued.plaintext,
            token_type: "Bearer".into(),
            user: user.info(),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    async fn handle_logout(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        resources.session_manager.revoke_all(auth.user.id).await?;

        let body = json!({ "message": error_messages::LOGOUT_SUCCESS });
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    async fn handle_me(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
    ) -> Result<Response, AppError> {
        let auth = resources.auth_middleware.authenticate_headers(&headers).await?;
        Ok((StatusCode::OK, Json(auth.user.info())).into_response())
    }
}
