//! Error conversions - From implementations for common error types
//!
//! Lets `?` lift std, serde_json and (feature-gated) sqlx errors into
//! [`AppError`], and renders [`AppError`] as an axum response.

use super::app_error::AppError;
use super::kind::ErrorKind;

// ============================================================================
// Standard library conversions
// ============================================================================

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::Forbidden,
            std::io::ErrorKind::TimedOut => ErrorKind::RequestTimeout,
            _ => ErrorKind::InternalServerError,
        };
        AppError::new(kind, "I/O operation failed").with_source(err)
    }
}

impl From<std::string::FromUtf8Error> for AppError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AppError::bad_request("Invalid UTF-8 string").with_source(err)
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::bad_request("Invalid integer format").with_source(err)
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::bad_request("Invalid identifier").with_source(err)
    }
}

// ============================================================================
// serde_json conversions
// ============================================================================

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_syntax() || err.is_data() || err.is_eof() {
            AppError::bad_request(format!("JSON parse error: {}", err)).with_source(err)
        } else {
            AppError::internal("JSON serialization error").with_source(err)
        }
    }
}

// ============================================================================
// SQLx conversions (feature-gated)
// ============================================================================

/// Maps a PostgreSQL SQLSTATE onto an [`AppError`].
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>.
#[cfg(feature = "sqlx")]
fn from_sqlstate(code: &str) -> AppError {
    match code {
        // Class 23: integrity constraint violation
        "23505" => AppError::conflict("Duplicate key value"),
        "23503" => AppError::conflict("Referenced record does not exist"),
        "23000" | "23001" => AppError::conflict("Integrity constraint violation"),
        "23502" => AppError::bad_request("Required field is null"),
        "23514" => AppError::bad_request("Check constraint violation"),
        // Class 22: data exception (value too long, out of range)
        "22001" => AppError::bad_request("Value too long"),
        "22003" => AppError::bad_request("Numeric value out of range"),
        // Class 40: transaction rollback (serialization failure, deadlock)
        "40001" | "40P01" => AppError::conflict("Concurrent update, retry the request"),
        "42501" => AppError::forbidden("Insufficient privilege"),
        "53000" | "53100" | "53200" | "53300" => {
            AppError::service_unavailable("Database resource exhausted")
        }
        "57000" | "57014" | "57P01" | "57P02" | "57P03" => {
            AppError::service_unavailable("Database unavailable")
        }
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let app_err = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut => {
                AppError::service_unavailable("Database connection pool exhausted")
            }
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => from_sqlstate(code.as_ref()),
                None => AppError::internal("Database error"),
            },
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
            sqlx::Error::Protocol(_) => AppError::internal("Database protocol error"),
            _ => AppError::internal("Database error"),
        };
        app_err.with_source(err)
    }
}

// ============================================================================
// Axum conversions (feature-gated)
// ============================================================================

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::StatusCode;

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // RFC 7807 Problem Details
        let body = serde_json::json!({
            "type": format!("https://httpstatuses.io/{}", self.status_code()),
            "title": self.kind().as_str(),
            "status": self.status_code(),
            "detail": self.message(),
            "action": self.action(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let app_err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(app_err.kind(), ErrorKind::NotFound);

        let app_err: AppError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(app_err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn test_uuid_error_is_bad_request() {
        let err = uuid::Uuid::parse_str("not-a-uuid").unwrap_err();
        let app_err: AppError = err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"title\":").unwrap_err();
        let app_err: AppError = json_err.into();
        assert_eq!(app_err.kind(), ErrorKind::BadRequest);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(from_sqlstate("23505").kind(), ErrorKind::Conflict);
        assert_eq!(from_sqlstate("23503").kind(), ErrorKind::Conflict);
        assert_eq!(from_sqlstate("22001").kind(), ErrorKind::BadRequest);
        assert_eq!(from_sqlstate("40001").kind(), ErrorKind::Conflict);
        assert_eq!(from_sqlstate("57P01").kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(from_sqlstate("XX000").kind(), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_row_not_found_is_404() {
        let app_err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(app_err.status_code(), 404);
    }

    #[cfg(feature = "axum")]
    #[test]
    fn test_into_response_uses_kind_status() {
        use axum::response::IntoResponse;

        let response = AppError::forbidden("Not the owner of this set").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::FORBIDDEN);
    }
}
