// ABOUTME: Main library entry point for the Tutorhub tutoring platform backend
// ABOUTME: Provides bearer-session authentication, lesson CRUD, and AI-assisted Q&A
//
// SPDX-License-Identifier: MIT OR Apache-2.0

#![deny(unsafe_code)]

//! # Tutorhub Server
//!
//! A small tutoring-platform backend. Students register, log in with a
//! bearer session token, read lessons, and ask questions that are answered
//! by an external chat-completion provider. Admins upload lessons.
//!
//! ## Architecture
//!
//! - **Session core**: opaque server-side tokens with per-token ability
//!   scoping, 24h expiry measured from creation, and a per-account
//!   concurrent-session cap enforced at issuance
//! - **Storage**: pluggable [`database_plugins::DatabaseProvider`] backends
//!   (SQLite for deployments, in-memory for tests)
//! - **Routes**: axum routers per resource, sharing [`context::ServerResources`]
//! - **Envelope**: every response is normalized to JSON with a fixed CORS
//!   header set

/// Ability (capability) sets and the per-request authorization gate
pub mod abilities;

/// Session token issuance, validation, expiry, and revocation
pub mod auth;

/// Configuration management from environment variables
pub mod config;

/// Application constants, limits, and user-facing messages
pub mod constants;

/// Shared server state handed to every router
pub mod context;

/// Database abstraction layer with plugin support
pub mod database_plugins;

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Chat-completion provider abstraction for AI-assisted answers
pub mod llm;

/// Production logging and structured output
pub mod logging;

/// HTTP middleware: token authentication and response envelope normalization
pub mod middleware;

/// Common data models: users, session tokens, lessons, questions
pub mod models;

/// Lexical lesson recommendation scoring
pub mod recommendation;

/// HTTP routes for auth, lessons, questions, and AI endpoints
pub mod routes;
