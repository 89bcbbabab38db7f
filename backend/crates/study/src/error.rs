//! Study Error Types
//!
//! Study-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Study-specific result type alias
pub type StudyResult<T> = Result<T, StudyError>;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("Flashcard set not found")]
    SetNotFound,

    #[error("Flashcard not found in set")]
    FlashcardNotFound,

    #[error("Mind map not found in set")]
    MindMapNotFound,

    #[error("User not found")]
    UserNotFound,

    /// Field-level input validation
    #[error("{0}")]
    Validation(String),

    /// A connection or layout references something outside the set
    #[error("Invalid mind map graph: {0}")]
    InvalidGraph(String),

    /// The same edge or node appears twice in one request
    #[error("Conflicting mind map graph: {0}")]
    GraphConflict(String),

    #[error("A mind map with this title already exists in the set")]
    DuplicateTitle,

    /// Private resource requested without credentials
    #[error("Authentication required")]
    Unauthenticated,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StudyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StudyError::SetNotFound
            | StudyError::FlashcardNotFound
            | StudyError::MindMapNotFound
            | StudyError::UserNotFound => ErrorKind::NotFound,
            StudyError::Validation(_) | StudyError::InvalidGraph(_) => ErrorKind::BadRequest,
            StudyError::GraphConflict(_) | StudyError::DuplicateTitle => ErrorKind::Conflict,
            StudyError::Unauthenticated => ErrorKind::Unauthorized,
            StudyError::Forbidden(_) => ErrorKind::Forbidden,
            StudyError::Database(e) => database_kind(e),
            StudyError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Convert to AppError. Database details stay in the logs.
    pub fn into_app_error(self) -> AppError {
        match self {
            StudyError::Database(e) => AppError::from(e),
            StudyError::Internal(_) => AppError::internal("Internal server error"),
            StudyError::DuplicateTitle => AppError::conflict(self.to_string())
                .with_action("Choose a different title"),
            other => AppError::new(other.kind(), other.to_string()),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            StudyError::Database(e) => {
                tracing::error!(error = %e, "Study database error");
            }
            StudyError::Internal(msg) => {
                tracing::error!(message = %msg, "Study internal error");
            }
            StudyError::Forbidden(reason) => {
                tracing::warn!(reason = %reason, "Ownership check failed");
            }
            _ => {
                tracing::debug!(error = %self, "Study error");
            }
        }
    }
}

fn database_kind(err: &sqlx::Error) -> ErrorKind {
    match err {
        sqlx::Error::RowNotFound => ErrorKind::NotFound,
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => ErrorKind::ServiceUnavailable,
        sqlx::Error::Database(db)
            if db.is_unique_violation() || db.is_foreign_key_violation() =>
        {
            ErrorKind::Conflict
        }
        sqlx::Error::Database(db) if db.is_check_violation() => ErrorKind::BadRequest,
        _ => ErrorKind::InternalServerError,
    }
}

impl IntoResponse for StudyError {
    fn into_response(self) -> Response {
        self.log();
        self.into_app_error().into_response()
    }
}

impl From<StudyError> for AppError {
    fn from(err: StudyError) -> Self {
        err.log();
        err.into_app_error()
    }
}

impl From<AppError> for StudyError {
    fn from(err: AppError) -> Self {
        StudyError::Internal(err.to_string())
    }
}
