// ABOUTME: Configuration module for deployment-specific settings
// ABOUTME: Re-exports the environment-based server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration management

/// Environment-based configuration parsing
pub mod environment;

pub use environment::{
    AuthConfig, CorsConfig, DatabaseUrl, LlmConfig, LogLevel, ServerConfig,
};
