//! Task error types
//!
//! The taxonomy separates what went wrong *before* any network activity
//! (configuration), what went wrong talking to the service (execution), and
//! a negative evaluated outcome (a failed test run). Close-time failures are
//! attached to the primary outcome, never dropped and never masking it.

use capstan_client::ClientError;
use capstan_core::CoreError;
use thiserror::Error;

use crate::event::{ListenerError, Operation};

/// Result type for task execution
pub type Result<T> = std::result::Result<T, TaskError>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TaskError {
    /// Configuration rejected before any network activity
    #[error("invalid configuration: {0}")]
    Config(#[source] CoreError),

    /// Configuration rejected before any network activity
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Chart could not be loaded or written
    #[error("chart error: {0}")]
    Chart(#[source] CoreError),

    /// No chart at the configured (or defaulted) location
    #[error("non-existent or unresolvable chart source: {location}")]
    ChartNotFound { location: String },

    /// A values or chart document could not be fetched
    #[error("failed to fetch {url}: {message}")]
    Fetch { url: url::Url, message: String },

    /// The target URI scheme is not supported
    #[error("unsupported scheme '{scheme}' in {url}")]
    UnsupportedScheme { scheme: String, url: url::Url },

    /// The service connection could not be built
    #[error("failed to connect to the release service")]
    Connect {
        #[source]
        source: ClientError,
    },

    /// The remote operation failed
    #[error("{operation} operation failed")]
    Remote {
        operation: Operation,
        #[source]
        source: ClientError,
    },

    /// A listener failed while handling a response
    #[error("listener failed while handling a {operation} response")]
    Listener {
        operation: Operation,
        #[source]
        source: ListenerError,
    },

    /// A test run reported failure status
    ///
    /// The operation itself succeeded mechanically; the evaluated outcome
    /// was negative.
    #[error("release test failed: {message}")]
    FailedRun { message: String },

    /// Closing the connection failed after an otherwise successful task
    #[error("failed to close the release service connection")]
    Close {
        #[source]
        source: ClientError,
    },

    /// A primary failure with a close-time failure attached
    #[error("{primary}; additionally, closing the connection failed: {close}")]
    Suppressed {
        #[source]
        primary: Box<TaskError>,
        close: ClientError,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskError {
    /// Attach a close-time failure without masking this error
    pub(crate) fn with_close_failure(self, close: ClientError) -> Self {
        TaskError::Suppressed {
            primary: Box::new(self),
            close,
        }
    }

    /// Whether this failure was raised before any network activity
    pub fn is_configuration(&self) -> bool {
        match self {
            Self::Config(_) | Self::InvalidConfig { .. } => true,
            Self::Suppressed { primary, .. } => primary.is_configuration(),
            _ => false,
        }
    }

    /// Whether this failure is a negative evaluated outcome (failed test run)
    pub fn is_failed_run(&self) -> bool {
        match self {
            Self::FailedRun { .. } => true,
            Self::Suppressed { primary, .. } => primary.is_failed_run(),
            _ => false,
        }
    }
}
