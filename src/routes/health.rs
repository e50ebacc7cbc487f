// ABOUTME: Liveness endpoint
// ABOUTME: Unauthenticated health probe for deployment checks
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::context::ServerResources;

/// Health routes
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        Json(json!({
            "status": "ok",
            "backend": resources.database.backend_info(),
        }))
    }
}
