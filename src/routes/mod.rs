// ABOUTME: HTTP route assembly for the Tutorhub server
// ABOUTME: Merges per-resource routers and applies the envelope layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP routes
//!
//! Each resource contributes its own router; this module merges them and
//! wraps the result in the response envelope so every reply leaves the
//! server normalized.

use std::sync::Arc;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::context::ServerResources;
use crate::middleware::envelope;

/// AI answer and recommendation routes
pub mod ai;

/// Registration, login, logout, and current-user routes
pub mod auth;

/// Liveness endpoint
pub mod health;

/// Lesson upload and browsing routes
pub mod lessons;

/// Question submission and listing routes
pub mod questions;

/// Build the complete application router
pub fn router(resources: Arc<ServerResources>) -> Router {
    let cors = resources.config.cors.clone();
    Router::new()
        .merge(auth::AuthRoutes::routes(resources.clone()))
        .merge(lessons::LessonRoutes::routes(resources.clone()))
        .merge(questions::QuestionRoutes::routes(resources.clone()))
        .merge(ai::AiRoutes::routes(resources.clone()))
        .merge(health::HealthRoutes::routes(resources))
        .layer(middleware::from_fn_with_state(
            cors,
            envelope::normalize_response,
        ))
        .layer(TraceLayer::new_for_http())
}
