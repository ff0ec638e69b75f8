//! Error types for the storefront client

use thiserror::Error;

use crate::envelope::ApiFailure;

/// Storefront client error
///
/// Wire failures never surface here directly: `Gateway::send` resolves them
/// into `Envelope::Failure`. This type covers local failures and the
/// explicit conversion of a failure envelope via `Envelope::into_result`.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Base URL could not be parsed
    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    /// Header name or value rejected by the HTTP stack
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session file could not be read or written
    #[error("Session store error: {0}")]
    Session(#[from] std::io::Error),

    /// Backend answered with a failure envelope
    #[error("{0}")]
    Api(ApiFailure),
}

impl From<ApiFailure> for GatewayError {
    fn from(failure: ApiFailure) -> Self {
        GatewayError::Api(failure)
    }
}

/// Result type for storefront client operations
pub type Result<T> = std::result::Result<T, GatewayError>;
