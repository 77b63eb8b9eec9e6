use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Request-level failure taxonomy. Everything a handler can fail with maps
/// onto one of these; the `IntoResponse` impl decides how much of it the
/// caller is allowed to see.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or malformed input, reported with field guidance.
    Validation(String),
    /// Absent resource, reported generically.
    NotFound(String),
    /// Missing, malformed, expired or forged token. Every cause collapses
    /// into this one variant so the response leaks nothing about why.
    Authentication,
    /// Failed login. Unknown email and wrong password read identically.
    InvalidCredentials,
    /// Failed password re-verification during a sale. The actor already
    /// proved identity via the token, so this one is allowed to be
    /// distinguishable from `Authentication`.
    IncorrectPassword,
    /// Authenticated but denied by policy. The reason stays server-side.
    Authorization,
    /// Duplicate email, duplicate favorite. Specific messages help
    /// legitimate callers.
    Conflict(String),
    /// Store or infrastructure failure. Detail is logged, never returned.
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "validation error: {}", msg),
            ApiError::NotFound(msg) => write!(f, "not found: {}", msg),
            ApiError::Authentication => write!(f, "not authenticated"),
            ApiError::InvalidCredentials => write!(f, "invalid credentials"),
            ApiError::IncorrectPassword => write!(f, "incorrect password"),
            ApiError::Authorization => write!(f, "not authorized"),
            ApiError::Conflict(msg) => write!(f, "conflict: {}", msg),
            ApiError::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Authentication | ApiError::InvalidCredentials | ApiError::IncorrectPassword => {
                StatusCode::UNAUTHORIZED
            }
            ApiError::Authorization => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &str {
        match self {
            ApiError::Validation(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg,
            ApiError::Authentication => "Not authorized, invalid or missing token.",
            ApiError::InvalidCredentials => "Invalid credentials.",
            ApiError::IncorrectPassword => "Incorrect password.",
            ApiError::Authorization => "You do not have permission to perform this action.",
            ApiError::Internal(_) => "Internal server error.",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            log::error!("internal error: {}", detail);
        }
        let body = Json(json!({ "message": self.public_message() }));
        (self.status(), body).into_response()
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};
        match err {
            Error::NotFound => ApiError::NotFound("Resource not found.".to_string()),
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                ApiError::Conflict("Resource already exists.".to_string())
            }
            other => ApiError::Internal(format!("database error: {}", other)),
        }
    }
}

impl From<diesel::r2d2::PoolError> for ApiError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        ApiError::Internal(format!("connection pool error: {}", err))
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(format!("password hashing error: {}", err))
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::Validation(format!("Malformed multipart request: {}.", err))
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(format!("io error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::IncorrectPassword.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Authorization.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_detail_never_reaches_the_body() {
        let err = ApiError::Internal("connection refused at 10.0.0.3".into());
        assert_eq!(err.public_message(), "Internal server error.");
    }

    #[test]
    fn unique_violations_become_conflicts() {
        let err = diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_string()),
        );
        assert!(matches!(ApiError::from(err), ApiError::Conflict(_)));
    }

    #[test]
    fn missing_rows_become_not_found() {
        assert!(matches!(
            ApiError::from(diesel::result::Error::NotFound),
            ApiError::NotFound(_)
        ));
    }
}
