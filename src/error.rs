use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Errors returned by the session store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Email or password was empty.
    #[error("Email and password are required")]
    MissingCredentials,

    /// The backend rejected the credentials.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// The operation needs a signed-in identity.
    #[error("No active session")]
    NoActiveSession,

    /// The authentication backend failed.
    #[error("Authentication backend error: {0}")]
    Backend(String),
}

/// Errors raised by persisted flag storage.
#[derive(Error, Debug)]
pub enum FlagError {
    /// An I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage file could not be parsed or written.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A Redis error.
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// The application's error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// A session store error.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The session store was looked up outside its provisioning layer.
    #[error("Session store is not provided for this request")]
    MissingSessionProvider,
}

/// A `Result` type that uses `AppError` as the error type.
pub type Result<T> = std::result::Result<T, AppError>;

/// A `Result` type for session store operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;

impl From<garde::Report> for AppError {
    fn from(report: garde::Report) -> Self {
        AppError::Validation(report.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Auth(ref e) => match e {
                AuthError::MissingCredentials => {
                    tracing::debug!("Authentication rejected: {}", e);
                    (StatusCode::BAD_REQUEST, e.to_string())
                }
                AuthError::InvalidCredentials | AuthError::NoActiveSession => {
                    tracing::warn!("Authentication failed: {}", e);
                    (StatusCode::UNAUTHORIZED, e.to_string())
                }
                AuthError::Backend(msg) => {
                    tracing::error!("Authentication backend error: {}", msg);
                    (StatusCode::BAD_GATEWAY, "Authentication backend error".to_string())
                }
            },

            AppError::Validation(ref msg) => {
                tracing::debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg.clone())
            }

            AppError::MissingSessionProvider => {
                tracing::error!("❌ Session store requested outside the provide_session layer");
                (StatusCode::INTERNAL_SERVER_ERROR, "Session store not provided".to_string())
            }
        };

        let body = sonic_rs::to_string(&sonic_rs::json!({
            "error": message
        }))
        .unwrap_or_else(|_| r#"{"error":"Internal server error"}"#.to_string());

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}
