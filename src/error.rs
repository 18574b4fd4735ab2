//!
//! # Error Handling
//!
//! Central error type for the application. Every fallible operation returns
//! [`AppError`], and handlers surface it with `?`; the `ResponseError`
//! implementation turns each kind into the HTTP status and JSON body
//! (`{"detail": <message>}`) the API promises.
//!
//! Authentication failures deliberately collapse into two fixed messages:
//! `BadCredentials` never reveals whether the email or the password was
//! wrong, and `Unauthorized` never reveals which token check failed.

use actix_web::http::header;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    /// Login failure (HTTP 400). Unknown email and wrong password are
    /// indistinguishable to the caller.
    BadCredentials,
    /// Uniqueness violation on username or email (HTTP 400).
    Conflict(String),
    /// Missing resource (HTTP 404).
    NotFound(String),
    /// Missing, malformed, expired, or otherwise unusable bearer token
    /// (HTTP 401 with a `WWW-Authenticate: Bearer` challenge).
    Unauthorized,
    /// Authenticated but not the owner of the target resource (HTTP 403).
    Forbidden,
    /// Failed input validation (HTTP 422).
    Validation(String),
    /// Storage-layer failure (HTTP 500).
    Database(String),
    /// Any other server-side failure (HTTP 500).
    Internal(String),
}

impl AppError {
    /// The message carried in the JSON `detail` field.
    fn detail(&self) -> &str {
        match self {
            AppError::BadCredentials => "Incorrect email or password",
            AppError::Conflict(msg) => msg,
            AppError::NotFound(msg) => msg,
            AppError::Unauthorized => "Could not validate credentials",
            AppError::Forbidden => "Not enough permissions",
            AppError::Validation(msg) => msg,
            AppError::Database(msg) => msg,
            AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::BadCredentials => write!(f, "Bad Credentials: {}", self.detail()),
            AppError::Conflict(_) => write!(f, "Conflict: {}", self.detail()),
            AppError::NotFound(_) => write!(f, "Not Found: {}", self.detail()),
            AppError::Unauthorized => write!(f, "Unauthorized: {}", self.detail()),
            AppError::Forbidden => write!(f, "Forbidden: {}", self.detail()),
            AppError::Validation(_) => write!(f, "Validation Error: {}", self.detail()),
            AppError::Database(_) => write!(f, "Database Error: {}", self.detail()),
            AppError::Internal(_) => write!(f, "Internal Server Error: {}", self.detail()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadCredentials | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let AppError::Unauthorized = self {
            builder.insert_header((header::WWW_AUTHENTICATE, "Bearer"));
        }
        builder.json(json!({ "detail": self.detail() }))
    }
}

/// Storage errors. A unique-constraint violation slipping past the explicit
/// pre-insert checks still surfaces as the proper `Conflict`; the constraint
/// name tells username and email apart.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match &error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                if db.constraint().map_or(false, |c| c.contains("username")) {
                    AppError::Conflict("Username already exists.".into())
                } else {
                    AppError::Conflict("Email already exists.".into())
                }
            }
            _ => AppError::Database(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::Validation(error.to_string())
    }
}

/// Token processing failures (bad signature, malformed payload, ...) all
/// fold into the single `Unauthorized` case.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(_: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(format!("Password hashing failed: {}", error))
    }
}
