//! Error types for capstan-client

use thiserror::Error;

/// Result type for capstan-client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur while talking to the release service
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Kubernetes API error (cluster client construction, pod lookup)
    #[error("Kubernetes API error: {0}")]
    Kube(#[from] kube::Error),

    /// No reachable release-service endpoint
    #[error("release service unavailable: {message}")]
    ServiceUnavailable { message: String },

    /// HTTP transport error
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("{operation} rejected by the release service: {message}")]
    Status {
        operation: &'static str,
        message: String,
    },

    /// The service answered with a payload we could not decode
    #[error("failed to decode {operation} response: {message}")]
    Decode {
        operation: &'static str,
        message: String,
    },

    /// Chart could not be encoded for transport
    #[error("failed to encode chart: {0}")]
    Chart(#[from] capstan_core::CoreError),

    /// Invalid service URL
    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    /// Connection close failed
    #[error("failed to close the connection: {message}")]
    Close { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
