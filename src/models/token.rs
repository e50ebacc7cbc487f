// ABOUTME: Session token record and ability set
// ABOUTME: Stored token metadata; the raw token value never persists
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::abilities;

/// Set of ability strings attached to a session token
///
/// An ability grants one action class (`lesson:read`, `question:create`).
/// The wildcard `*` grants everything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct AbilitySet(Vec<String>);

impl AbilitySet {
    #[must_use]
    pub fn new(abilities: Vec<String>) -> Self {
        Self(abilities)
    }

    /// Exact match or wildcard; no prefix or pattern expansion
    #[must_use]
    pub fn permits(&self, ability: &str) -> bool {
        self.0
            .iter()
            .any(|a| a == ability || a == abilities::WILDCARD)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<&str>> for AbilitySet {
    fn from(abilities: Vec<&str>) -> Self {
        Self(abilities.into_iter().map(str::to_owned).collect())
    }
}

/// Stored session token metadata
///
/// Only the SHA-256 digest and a short lookup prefix of the raw value are
/// kept. Presenting a matching raw value is the sole proof of ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    /// Unique token identifier
    pub id: String,
    /// Owning account
    pub user_id: Uuid,
    /// SHA-256 hex digest of the raw token value
    pub token_hash: String,
    /// Leading characters of the raw value, for lookup and support tooling
    pub token_prefix: String,
    /// Abilities granted to this token at issuance
    pub abilities: AbilitySet,
    /// Issuance time; expiry is measured from here and never extended
    pub created_at: DateTime<Utc>,
    /// Last successful validation, if any
    pub last_used_at: Option<DateTime<Utc>>,
}

impl SessionToken {
    /// Whether the token is past its lifetime at the given instant
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, ttl_hours: i64) -> bool {
        now >= self.created_at + Duration::hours(ttl_hours)
    }
}
