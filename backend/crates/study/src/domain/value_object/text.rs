//! Bounded text fields
//!
//! Every user-supplied string column has a length limit mirrored by the
//! schema. Required fields must contain something other than whitespace.

use derive_more::Display;
use serde::Serialize;

use crate::error::{StudyError, StudyResult};

fn check(field: &str, value: &str, required: bool, max: usize) -> StudyResult<()> {
    if required && value.trim().is_empty() {
        return Err(StudyError::Validation(format!("{field} is required")));
    }
    let len = value.chars().count();
    if len > max {
        return Err(StudyError::Validation(format!(
            "{field} must be at most {max} characters (got {len})"
        )));
    }
    Ok(())
}

macro_rules! bounded_text {
    ($(#[$meta:meta])* $name:ident, $field:literal, required = $required:literal, max = $max:literal, trim = $trim:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
        #[display("{_0}")]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const MAX_CHARS: usize = $max;

            pub fn new(raw: &str) -> StudyResult<Self> {
                let value = if $trim { raw.trim() } else { raw };
                check($field, value, $required, $max)?;
                Ok(Self(value.to_string()))
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
    };
}

bounded_text!(
    /// Title of a set or mind map
    Title, "title", required = true, max = 100, trim = true
);
bounded_text!(Term, "term", required = true, max = 200, trim = false);
bounded_text!(Solution, "solution", required = true, max = 1000, trim = false);
bounded_text!(
    /// Free-form tag grouping flashcards
    Concept, "concept", required = false, max = 100, trim = true
);
bounded_text!(
    /// Label of a mind map edge
    Relationship, "relationship", required = false, max = 200, trim = false
);
bounded_text!(
    /// Opaque per-node data owned by the frontend
    LayoutData, "layout data", required = false, max = 200, trim = false
);
