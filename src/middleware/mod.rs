// ABOUTME: HTTP middleware for the Tutorhub server
// ABOUTME: Bearer-token authentication and response envelope normalization
//
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Bearer-token authentication for protected routes
pub mod auth;

/// Response envelope: forced JSON bodies and fixed CORS headers
pub mod envelope;

pub use auth::{AuthResult, TokenAuthMiddleware};
