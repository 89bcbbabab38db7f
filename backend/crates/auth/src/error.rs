//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer header and no token cookie
    #[error("Authentication required")]
    MissingToken,

    /// Signature, issuer, audience or claim validation failed
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token has expired")]
    TokenExpired,

    /// The identity provider's keys could not be fetched
    #[error("Signing keys unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Invalid nickname: {0}")]
    InvalidNickname(String),

    /// Another user already owns the nickname asserted by the token
    #[error("Nickname is already taken")]
    NicknameTaken,

    #[error("User not found")]
    UserNotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::KeyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::InvalidNickname(_) => StatusCode::BAD_REQUEST,
            AuthError::NicknameTaken => StatusCode::CONFLICT,
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired => {
                ErrorKind::Unauthorized
            }
            AuthError::KeyUnavailable(_) => ErrorKind::ServiceUnavailable,
            AuthError::InvalidNickname(_) => ErrorKind::BadRequest,
            AuthError::NicknameTaken => ErrorKind::Conflict,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// `true` when the request should continue anonymously on routes where
    /// authentication is optional.
    pub fn is_credential_problem(&self) -> bool {
        matches!(
            self,
            AuthError::MissingToken | AuthError::InvalidToken(_) | AuthError::TokenExpired
        )
    }

    /// Convert to AppError. Token details stay in the logs.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AuthError::InvalidToken(_) => AppError::unauthorized("Invalid token")
                .with_action("Sign in again to obtain a new token"),
            AuthError::TokenExpired => AppError::unauthorized("Token has expired")
                .with_action("Sign in again to obtain a new token"),
            AuthError::KeyUnavailable(_) => {
                AppError::service_unavailable("Identity provider unavailable")
            }
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    pub(crate) fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::KeyUnavailable(msg) => {
                tracing::error!(reason = %msg, "Identity provider keys unavailable");
            }
            AuthError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Rejected token");
            }
            AuthError::NicknameTaken => {
                tracing::warn!("Nickname collision during user sync");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind as JwtKind;

        match err.kind() {
            JwtKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken(err.to_string()),
        }
    }
}

impl From<platform::jwks::JwksError> for AuthError {
    fn from(err: platform::jwks::JwksError) -> Self {
        use platform::jwks::JwksError;

        match err {
            JwksError::UnknownKid(kid) => AuthError::InvalidToken(format!("unknown kid {kid}")),
            other => AuthError::KeyUnavailable(other.to_string()),
        }
    }
}
