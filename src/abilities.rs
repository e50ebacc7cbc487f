// ABOUTME: Role-to-ability mapping and the per-request authorization gate
// ABOUTME: Abilities are fixed at token issuance and checked per endpoint
//
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ability policy
//!
//! The mapping from role to ability set is applied once, at login. Changing
//! a user's role never alters tokens already issued.

use crate::constants::abilities;
use crate::errors::{AppError, AppResult};
use crate::models::{AbilitySet, SessionToken, UserRole};

/// Ability set granted to tokens issued for the given role
#[must_use]
pub fn abilities_for(role: UserRole) -> AbilitySet {
    match role {
        UserRole::Admin => AbilitySet::from(vec![abilities::WILDCARD]),
        UserRole::Student => {
            AbilitySet::from(vec![abilities::LESSON_READ, abilities::QUESTION_CREATE])
        }
    }
}

/// Reject the request unless the token grants the required ability
///
/// # Errors
///
/// Returns a permission-denied error when the ability is absent
pub fn require_ability(token: &SessionToken, ability: &str) -> AppResult<()> {
    if token.abilities.permits(ability) {
        Ok(())
    } else {
        Err(AppError::permission_denied())
    }
}
