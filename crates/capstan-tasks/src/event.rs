//! Event and listener dispatch
//!
//! A minimal observer pattern: every response produced by a task is wrapped
//! in an immutable [`ReleaseEvent`] and handed to each registered listener in
//! list order. Dispatch is synchronous and runs in the task's control flow;
//! a failing listener aborts the remaining notifications and the task.

use crate::error::TaskError;

/// The task kinds Capstan exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Install,
    Upgrade,
    Rollback,
    Uninstall,
    Status,
    Content,
    History,
    List,
    Test,
    Package,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Install => "install",
            Self::Upgrade => "upgrade",
            Self::Rollback => "rollback",
            Self::Uninstall => "uninstall",
            Self::Status => "status",
            Self::Content => "content",
            Self::History => "history",
            Self::List => "list",
            Self::Test => "test",
            Self::Package => "package",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable pairing of one response with the operation that produced it
///
/// Constructed once per response, handed to every listener, then discarded.
/// Diagnostics flow through `tracing` within the task's span.
#[derive(Debug)]
pub struct ReleaseEvent<R> {
    operation: Operation,
    response: R,
}

impl<R> ReleaseEvent<R> {
    pub fn new(operation: Operation, response: R) -> Self {
        Self {
            operation,
            response,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn response(&self) -> &R {
        &self.response
    }

    pub fn into_response(self) -> R {
        self.response
    }
}

/// Error type listener implementations may fail with
pub type ListenerError = Box<dyn std::error::Error + Send + Sync>;

/// A caller-supplied observer notified once per response
///
/// Implementations are stateless from the task's point of view; the same
/// listener value may be registered with several tasks.
pub trait ReleaseListener<R>: Send + Sync {
    fn on_event(&self, event: &ReleaseEvent<R>) -> Result<(), ListenerError>;
}

/// Default listener: logs each response at info level
pub struct LogListener;

impl<R: std::fmt::Debug> ReleaseListener<R> for LogListener {
    fn on_event(&self, event: &ReleaseEvent<R>) -> Result<(), ListenerError> {
        tracing::info!(
            operation = %event.operation(),
            response = ?event.response(),
        );
        Ok(())
    }
}

/// Notify every listener, in list order
///
/// No per-listener error containment: the first failure aborts the rest.
pub(crate) fn dispatch<R>(
    listeners: &[Box<dyn ReleaseListener<R>>],
    event: &ReleaseEvent<R>,
) -> Result<(), TaskError> {
    for listener in listeners {
        listener.on_event(event).map_err(|source| TaskError::Listener {
            operation: event.operation(),
            source,
        })?;
    }
    Ok(())
}
