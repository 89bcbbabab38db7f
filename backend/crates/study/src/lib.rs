//! Study Backend Module
//!
//! Flashcard sets, flashcards, mind maps and the blocks game leaderboard.
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, visibility and graph rules, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL implementation
//! - `presentation/` - HTTP handlers and router
//!
//! ## Access Model
//! - Anything public can be read by anyone; private things only by their owner
//! - Every write requires the owner
//! - Mind map connections and layouts only reference cards of the same set,
//!   checked inside the write transaction

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::StudyConfig;
pub use error::{StudyError, StudyResult};
pub use infra::PgStudyRepository;
pub use presentation::{StudyState, study_router};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}
