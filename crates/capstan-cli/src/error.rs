//! CLI error types with exit code handling

use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration rejected before any network activity
    #[error("Configuration error: {message}")]
    #[diagnostic(code(capstan::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Task document could not be read or parsed
    #[error("Task document error: {message}")]
    #[diagnostic(code(capstan::cli::document))]
    Document { message: String },

    /// A release test reported failure status
    #[error("Failed run: {message}")]
    #[diagnostic(code(capstan::cli::failed_run))]
    FailedRun { message: String },

    /// Connectivity or remote failure
    #[error("{message}")]
    #[diagnostic(code(capstan::cli::execution))]
    Execution { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(capstan::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Document { .. } => exit_codes::CONFIG_ERROR,
            CliError::FailedRun { .. } => exit_codes::FAILED_RUN,
            CliError::Execution { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a task document error
    pub fn document(message: impl Into<String>) -> Self {
        Self::Document {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<capstan_tasks::TaskError> for CliError {
    fn from(err: capstan_tasks::TaskError) -> Self {
        let message = render_chain(&err);
        if err.is_configuration() {
            CliError::Config {
                message,
                help: None,
            }
        } else if err.is_failed_run() {
            CliError::FailedRun { message }
        } else {
            CliError::Execution { message }
        }
    }
}

/// Render an error with its source chain, outermost first
fn render_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
