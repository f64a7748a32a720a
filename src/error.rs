//! ObjectGate Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type alias for ObjectGate operations
pub type Result<T> = std::result::Result<T, Error>;

/// ObjectGate error types
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    // Storage errors
    #[error("Store error: {0}")]
    Store(#[from] object_store::Error),

    // Network errors
    #[error("Network error: {0}")]
    Network(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Uncaught errors reaching the HTTP layer become a plain 500. Authorization,
/// missing-object, and unsupported-method outcomes are mapped by the handler
/// itself; everything else (store failures in particular) propagates here.
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
