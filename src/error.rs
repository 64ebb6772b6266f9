/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Error types shared by every layer of the client

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias used across the crate
pub type MscResult<T> = Result<T, AppError>;

/// Main error type for the library
#[derive(Debug, Error)]
pub enum AppError {
    /// Credentials rejected by the remote API (401)
    #[error("authentication failed")]
    AuthenticationFailed,
    /// Remote server error (5xx)
    #[error("service unavailable: {0}")]
    ServiceUnavailable(StatusCode),
    /// Any status code the caller does not model explicitly
    #[error("unexpected response - status code {status} - response: {body}")]
    Unexpected {
        /// Raw status returned by the server
        status: StatusCode,
        /// Raw body returned by the server
        body: String,
    },
    /// Resource not found (204 on lookups)
    #[error("not found")]
    NotFound,
    /// Request rejected as malformed (400)
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Request blocked by the account's billing status (402)
    #[error("billing error: {0}")]
    Billing(String),
    /// A monetary field could not be interpreted as a number
    #[error("conversion error: {0}")]
    Conversion(String),
    /// The transport call exceeded its timeout
    #[error("request timed out")]
    Timeout,
    /// Network level failure raised by the HTTP stack
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    /// JSON encoding or decoding failure
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// A decoded record could not be turned into the requested type
    #[error("deserialization error: {0}")]
    Deserialization(String),
    /// Invalid value supplied by the caller
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Invalid or missing configuration
    #[error("config error: {0}")]
    Config(String),
}

/// Coarse classification of [`AppError`] used by retry policies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`AppError::AuthenticationFailed`]
    AuthenticationFailed,
    /// See [`AppError::ServiceUnavailable`]
    ServiceUnavailable,
    /// See [`AppError::Unexpected`]
    Unexpected,
    /// See [`AppError::NotFound`]
    NotFound,
    /// See [`AppError::BadRequest`]
    BadRequest,
    /// See [`AppError::Billing`]
    Billing,
    /// See [`AppError::Conversion`]
    Conversion,
    /// See [`AppError::Timeout`]
    Timeout,
    /// See [`AppError::Network`]
    Network,
    /// JSON and deserialization failures
    Serialization,
    /// Caller or configuration mistakes
    InvalidInput,
}

impl AppError {
    /// Returns the kind of this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::AuthenticationFailed => ErrorKind::AuthenticationFailed,
            AppError::ServiceUnavailable(_) => ErrorKind::ServiceUnavailable,
            AppError::Unexpected { .. } => ErrorKind::Unexpected,
            AppError::NotFound => ErrorKind::NotFound,
            AppError::BadRequest(_) => ErrorKind::BadRequest,
            AppError::Billing(_) => ErrorKind::Billing,
            AppError::Conversion(_) => ErrorKind::Conversion,
            AppError::Timeout => ErrorKind::Timeout,
            AppError::Network(_) => ErrorKind::Network,
            AppError::Json(_) | AppError::Deserialization(_) => ErrorKind::Serialization,
            AppError::InvalidInput(_) | AppError::Config(_) => ErrorKind::InvalidInput,
        }
    }
}
