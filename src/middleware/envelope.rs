// ABOUTME: Response envelope normalization middleware
// ABOUTME: Forces JSON bodies, answers preflight, and attaches CORS headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Response envelope
//!
//! Applied outermost so every response leaves the server as JSON with the
//! same CORS header set, whatever the inner handler produced. Status codes
//! are passed through untouched.

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::json;

use crate::config::CorsConfig;

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Normalize every response to the JSON envelope
pub async fn normalize_response(
    State(cors): State<CorsConfig>,
    request: Request,
    next: Next,
) -> Response {
    // Preflight never reaches a handler
    if request.method() == Method::OPTIONS {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = StatusCode::OK;
        apply_cors(&mut response, &cors);
        return response;
    }

    let response = next.run(request).await;
    let (mut parts, body) = response.into_parts();

    // Handlers produce bounded JSON bodies; the limit is a backstop
    let bytes = match to_bytes(body, 10 * 1024 * 1024).await {
        Ok(bytes) => bytes,
        Err(_) => {
            parts.status = StatusCode::INTERNAL_SERVER_ERROR;
            let fallback = json!({
                "message": "An unexpected error occurred",
                "status": 500
            });
            let mut response =
                Response::from_parts(parts, Body::from(fallback.to_string()));
            force_json(&mut response);
            apply_cors(&mut response, &cors);
            return response;
        }
    };

    // Non-JSON payloads are wrapped so clients always see the envelope
    let body = if serde_json::from_slice::<serde_json::Value>(&bytes).is_ok() {
        Body::from(bytes)
    } else {
        let wrapped = json!({
            "message": String::from_utf8_lossy(&bytes).into_owned(),
            "status": parts.status.as_u16()
        });
        Body::from(wrapped.to_string())
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    let mut response = Response::from_parts(parts, body);
    force_json(&mut response);
    apply_cors(&mut response, &cors);
    response
}

fn force_json(response: &mut Response) {
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
}

fn apply_cors(response: &mut Response, cors: &CorsConfig) {
    let headers = response.headers_mut();
    if let Ok(origin) = HeaderValue::from_str(&cors.frontend_origin) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
        HeaderValue::from_static("true"),
    );
}
