// ABOUTME: User account models for the tutoring platform
// ABOUTME: User, UserRole, and the public UserInfo view
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;

/// User role controlling which abilities are attached to issued tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Platform administrator, receives the wildcard ability
    Admin,
    /// Learner, receives read and question abilities
    #[default]
    Student,
}

impl UserRole {
    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "student" => Ok(Self::Student),
            _ => Err(AppError::invalid_input(format!("Invalid user role: {s}"))),
        }
    }
}

/// Represents a registered account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    pub name: String,
    /// Email address (unique, used for login)
    pub email: String,
    /// Bcrypt password hash
    pub password_hash: String,
    /// Role used to derive token abilities at login
    pub role: UserRole,
    /// When the account was created
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with the given credentials
    #[must_use]
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: Utc::now(),
        }
    }

    /// Public view of the account, safe to embed in responses
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
        }
    }
}

/// Account fields exposed over the API; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserInfo {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        assert_eq!(UserRole::from_str("admin").unwrap(), UserRole::Admin);
        assert_eq!(UserRole::from_str("student").unwrap(), UserRole::Student);
        assert!(UserRole::from_str("superuser").is_err());
        assert_eq!(UserRole::Admin.as_str(), "admin");
    }

    #[test]
    fn test_user_info_hides_password_hash() {
        let user = User::new(
            "Ada".into(),
            "ada@example.com".into(),
            "$2b$12$hash".into(),
            UserRole::Student,
        );
        let json = serde_json::to_string(&user.info()).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("ada@example.com"));
    }
}
