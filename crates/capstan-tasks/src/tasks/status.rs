//! Status task - report the status of a release revision to listeners

use capstan_client::{
    ConnectionFactory, ReleaseService, ReleaseStatusRequest, ReleaseStatusResponse,
};
use capstan_core::validate_release_name;
use serde::Deserialize;

use super::finish;
use crate::error::{Result, TaskError};
use crate::event::{Operation, ReleaseEvent, ReleaseListener, dispatch};

/// Configuration for the status task
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release to inspect
    pub release_name: String,

    /// Revision to inspect; 0 means the latest
    #[serde(default)]
    pub version: u32,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            skip: false,
            release_name: String::new(),
            version: 0,
        }
    }
}

/// Run the status task
///
/// With no listeners registered there is nobody to observe the result, so
/// the remote call is skipped entirely.
pub async fn run<F>(
    config: &StatusConfig,
    factory: &F,
    listeners: &[Box<dyn ReleaseListener<ReleaseStatusResponse>>],
) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping status by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    if listeners.is_empty() {
        tracing::info!("skipping status: no listeners registered");
        return Ok(());
    }

    let request = ReleaseStatusRequest {
        name: config.release_name.clone(),
        version: config.version,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = retrieve_status(&service, request, listeners).await;
    finish(service, result).await
}

async fn retrieve_status<S: ReleaseService>(
    service: &S,
    request: ReleaseStatusRequest,
    listeners: &[Box<dyn ReleaseListener<ReleaseStatusResponse>>],
) -> Result<()> {
    tracing::info!(name = %request.name, version = request.version, "retrieving release status");
    let response = service
        .status(request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Status,
            source,
        })?;

    dispatch(listeners, &ReleaseEvent::new(Operation::Status, response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ListenerError, LogListener};
    use capstan_client::MockConnectionFactory;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_empty_listeners_short_circuits() {
        let factory = MockConnectionFactory::default();
        let config = StatusConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory, &[]).await.unwrap();

        // Execution never reached the connection factory
        assert_eq!(factory.connection_count(), 0);
        assert_eq!(factory.service().operation_counts().remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_status_dispatches_one_event() {
        struct Seen(Arc<AtomicUsize>);
        impl ReleaseListener<ReleaseStatusResponse> for Seen {
            fn on_event(
                &self,
                event: &ReleaseEvent<ReleaseStatusResponse>,
            ) -> std::result::Result<(), ListenerError> {
                assert_eq!(event.operation(), Operation::Status);
                assert_eq!(event.response().release.name, "myapp");
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        }

        let seen = Arc::new(AtomicUsize::new(0));
        let listeners: Vec<Box<dyn ReleaseListener<ReleaseStatusResponse>>> =
            vec![Box::new(Seen(Arc::clone(&seen)))];

        let factory = MockConnectionFactory::default();
        let config = StatusConfig {
            release_name: "myapp".to_string(),
            version: 2,
            ..Default::default()
        };

        run(&config, &factory, &listeners).await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        let requests = factory.service().status_requests();
        assert_eq!(requests[0].version, 2);
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_listener_failure_fails_the_task() {
        struct Failing;
        impl ReleaseListener<ReleaseStatusResponse> for Failing {
            fn on_event(
                &self,
                _event: &ReleaseEvent<ReleaseStatusResponse>,
            ) -> std::result::Result<(), ListenerError> {
                Err("broken sink".into())
            }
        }

        let listeners: Vec<Box<dyn ReleaseListener<ReleaseStatusResponse>>> =
            vec![Box::new(Failing)];
        let factory = MockConnectionFactory::default();
        let config = StatusConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        let result = run(&config, &factory, &listeners).await;

        assert!(matches!(result, Err(TaskError::Listener { .. })));
        // The connection is still released
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_log_listener_works_as_default() {
        let listeners: Vec<Box<dyn ReleaseListener<ReleaseStatusResponse>>> =
            vec![Box::new(LogListener)];
        let factory = MockConnectionFactory::default();
        let config = StatusConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory, &listeners).await.unwrap();
    }
}
