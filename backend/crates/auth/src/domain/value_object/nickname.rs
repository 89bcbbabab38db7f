//! Nickname Value Object
//!
//! The public handle of a user. It comes from the identity provider's token
//! and is used in URLs such as `/api/users/{nickname}/sets`.
//!
//! ## Invariants
//! - trimmed, 1..=100 characters
//! - no control characters

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

pub const NICKNAME_MAX_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct Nickname(String);

impl Nickname {
    pub fn new(raw: &str) -> AuthResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AuthError::InvalidNickname("nickname is empty".into()));
        }
        if trimmed.chars().count() > NICKNAME_MAX_LENGTH {
            return Err(AuthError::InvalidNickname(format!(
                "nickname exceeds {NICKNAME_MAX_LENGTH} characters"
            )));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(AuthError::InvalidNickname(
                "nickname contains control characters".into(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Lenient constructor for values taken from a verified token.
    ///
    /// Control characters are dropped and the result is cut to the maximum
    /// length. Returns `None` when nothing usable is left.
    pub fn from_claim(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_control())
            .take(NICKNAME_MAX_LENGTH)
            .collect();
        let cleaned = cleaned.trim();
        (!cleaned.is_empty()).then(|| Self(cleaned.to_string()))
    }

    /// Rows written by the database are trusted as-is.
    #[inline]
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
