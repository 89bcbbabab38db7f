//! External Subject Value Object
//!
//! The stable `sub` claim of the identity provider (for example
//! `auth0|64f1c2...`). It is the only key used to match a token to a local
//! user row.

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

pub const SUBJECT_MAX_LENGTH: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display("{_0}")]
#[serde(transparent)]
pub struct ExternalSubject(String);

impl ExternalSubject {
    pub fn new(raw: &str) -> AuthResult<Self> {
        if raw.is_empty() || raw.trim() != raw {
            return Err(AuthError::InvalidToken("subject claim is empty or padded".into()));
        }
        if raw.chars().count() > SUBJECT_MAX_LENGTH {
            return Err(AuthError::InvalidToken("subject claim is too long".into()));
        }
        Ok(Self(raw.to_string()))
    }

    #[inline]
    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
