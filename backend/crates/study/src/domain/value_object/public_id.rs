//! PublicId Value Object
//!
//! URL-facing identifier of sets, flashcards and mind maps. It wraps a
//! 21-character Nanoid so internal UUIDs never appear in URLs.
//!
//! ```rust
//! use study::domain::value_object::public_id::PublicId;
//!
//! let public_id = PublicId::new();
//! assert_eq!(public_id.as_str().len(), 21);
//! ```

use std::str::FromStr;

use nid::Nanoid;
use serde::{Deserialize, Serialize};

use crate::error::{StudyError, StudyResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PublicId(pub Nanoid);

impl PublicId {
    #[inline]
    pub fn new() -> Self {
        Self(Nanoid::new())
    }

    /// Parse a path or body value. Malformed values can never match a row,
    /// so callers usually turn the error into the matching "not found".
    #[inline]
    pub fn parse_str(s: &str) -> StudyResult<Self> {
        Nanoid::from_str(s)
            .map(PublicId)
            .map_err(|e| StudyError::Validation(format!("Invalid public id: {e}")))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for PublicId {
    type Err = StudyError;

    fn from_str(s: &str) -> StudyResult<Self> {
        PublicId::parse_str(s)
    }
}

impl Default for PublicId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
