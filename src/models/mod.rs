// ABOUTME: Core data models shared across the server
// ABOUTME: Users, session tokens, lessons, and questions
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Boundary models for the tutoring platform

/// Lesson and question records plus their request payloads
pub mod lesson;

/// Session token record and ability set
pub mod token;

/// User account and role definitions
pub mod user;

pub use lesson::{Lesson, Question};
pub use token::{AbilitySet, SessionToken};
pub use user::{User, UserInfo, UserRole};
