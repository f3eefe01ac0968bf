//! Error types and HTTP error response handling.
//!
//! The wire contract is status-code based: error responses carry no body.
//! The only "error" that echoes a body is the 409 on account/create, which
//! the account handler builds directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Application-wide error type.
///
/// Each variant maps to one HTTP status code:
///
/// - `AuthFailed` → 401 Unauthorized (bad credentials on user endpoints,
///   unknown capability key on gps/upload)
/// - `Forbidden` → 403 Forbidden (record missing or owned by someone else;
///   the two cases are deliberately indistinguishable so the endpoint is
///   not an existence oracle)
/// - `Database` → 406 Not Acceptable (insert rejected by a constraint,
///   and any other database failure — the contract does not distinguish
///   transient from permanent)
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (constraint violation, connection error).
    ///
    /// Wraps any sqlx::Error via `#[from]`, so service code can use `?`
    /// on every query.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Credentials (or the GPS capability key) did not authenticate.
    #[error("Authentication failed")]
    AuthFailed,

    /// The requested record is not the caller's to touch.
    #[error("Forbidden")]
    Forbidden,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::AuthFailed => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Database(ref err) => {
                // The client only sees the status; keep the detail server-side.
                tracing::error!(error = %err, "database error surfaced as 406");
                StatusCode::NOT_ACCEPTABLE
            }
        };

        // Status only, no body
        status.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_maps_to_401() {
        let response = AppError::AuthFailed.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn forbidden_maps_to_403() {
        let response = AppError::Forbidden.into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_map_to_406() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    }
}
