//! One module per task kind
//!
//! Each task is a pure function over its configuration: bind, validate
//! eagerly, connect exactly once, perform exactly one remote operation (or
//! consume one bounded response stream), dispatch events, and release the
//! connection on every exit path.

pub mod content;
pub mod history;
pub mod install;
pub mod list;
pub mod package;
pub mod rollback;
pub mod status;
pub mod test;
pub mod uninstall;
pub mod upgrade;

use capstan_client::ReleaseService;

use crate::error::TaskError;

pub(crate) fn default_timeout() -> u64 {
    300
}

pub(crate) fn default_limit() -> u64 {
    256
}

/// Close the service and fold close-time failures into the task outcome
///
/// A close failure after success becomes the task's failure; a close failure
/// after a primary failure is attached as a suppressed error.
pub(crate) async fn finish<S, T>(
    service: S,
    result: Result<T, TaskError>,
) -> Result<T, TaskError>
where
    S: ReleaseService,
{
    let closed = service.close().await;
    match (result, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(source)) => Err(TaskError::Close { source }),
        (Err(primary), Ok(())) => Err(primary),
        (Err(primary), Err(close)) => Err(primary.with_close_failure(close)),
    }
}
