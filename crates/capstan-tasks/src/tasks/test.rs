//! Test task - run release tests and report each result to listeners
//!
//! A test run reporting failure status aborts processing: the failing result
//! is still dispatched, later results are never consumed, and the task fails
//! with a distinct "failed run" condition.

use capstan_client::{
    ConnectionFactory, ReleaseService, TestReleaseRequest, TestReleaseResponse, TestRunStatus,
};
use capstan_core::validate_release_name;
use futures::TryStreamExt;
use serde::Deserialize;

use super::{default_timeout, finish};
use crate::error::{Result, TaskError};
use crate::event::{Operation, ReleaseEvent, ReleaseListener, dispatch};

/// Configuration for the test task
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release to test
    pub release_name: String,

    /// Delete test resources after the run
    #[serde(default)]
    pub cleanup: bool,

    /// Operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            skip: false,
            release_name: String::new(),
            cleanup: false,
            timeout: default_timeout(),
        }
    }
}

/// Run the test task
pub async fn run<F>(
    config: &TestConfig,
    factory: &F,
    listeners: &[Box<dyn ReleaseListener<TestReleaseResponse>>],
) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping test by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    if listeners.is_empty() {
        tracing::info!("skipping test: no listeners registered");
        return Ok(());
    }

    let request = TestReleaseRequest {
        name: config.release_name.clone(),
        cleanup: config.cleanup,
        timeout_secs: config.timeout,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = test_release(&service, request, listeners).await;
    finish(service, result).await
}

async fn test_release<S: ReleaseService>(
    service: &S,
    request: TestReleaseRequest,
    listeners: &[Box<dyn ReleaseListener<TestReleaseResponse>>],
) -> Result<()> {
    tracing::info!(name = %request.name, "testing release");

    let mut results = service.test(request);
    while let Some(response) = results.try_next().await.map_err(|source| TaskError::Remote {
        operation: Operation::Test,
        source,
    })? {
        let failed = response.status == TestRunStatus::Failure;
        let message = response.msg.clone();

        // The failing result is dispatched before the abort.
        dispatch(listeners, &ReleaseEvent::new(Operation::Test, response))?;

        if failed {
            return Err(TaskError::FailedRun { message });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ListenerError, LogListener};
    use capstan_client::{MockConnectionFactory, MockReleaseService};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn result(msg: &str, status: TestRunStatus) -> TestReleaseResponse {
        TestReleaseResponse {
            msg: msg.to_string(),
            status,
        }
    }

    struct Counting(Arc<AtomicUsize>);
    impl ReleaseListener<TestReleaseResponse> for Counting {
        fn on_event(
            &self,
            _event: &ReleaseEvent<TestReleaseResponse>,
        ) -> std::result::Result<(), ListenerError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_empty_listeners_short_circuits() {
        let factory = MockConnectionFactory::default();
        let config = TestConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory, &[]).await.unwrap();

        assert_eq!(factory.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_all_successes_pass() {
        let service = MockReleaseService::new().with_test_results(vec![
            result("pod tests-1 succeeded", TestRunStatus::Success),
            result("pod tests-2 succeeded", TestRunStatus::Success),
        ]);
        let factory = MockConnectionFactory::new(service);

        let seen = Arc::new(AtomicUsize::new(0));
        let listeners: Vec<Box<dyn ReleaseListener<TestReleaseResponse>>> =
            vec![Box::new(Counting(Arc::clone(&seen)))];
        let config = TestConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory, &listeners).await.unwrap();

        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_failure_aborts_mid_stream() {
        let service = MockReleaseService::new().with_test_results(vec![
            result("pod tests-1 succeeded", TestRunStatus::Success),
            result("pod tests-2 failed", TestRunStatus::Failure),
            result("pod tests-3 succeeded", TestRunStatus::Success),
        ]);
        let factory = MockConnectionFactory::new(service);

        let seen = Arc::new(AtomicUsize::new(0));
        let listeners: Vec<Box<dyn ReleaseListener<TestReleaseResponse>>> =
            vec![Box::new(Counting(Arc::clone(&seen)))];
        let config = TestConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        let result = run(&config, &factory, &listeners).await;

        match result {
            Err(TaskError::FailedRun { message }) => {
                assert_eq!(message, "pod tests-2 failed");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        // The first and the failing result were dispatched; the third was
        // never produced.
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(factory.service().test_responses_produced(), 2);
        // The connection is still released
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_close_failure_attaches_to_primary_failure() {
        let service = MockReleaseService::new()
            .with_test_results(vec![result("pod tests-1 failed", TestRunStatus::Failure)])
            .with_close_error("socket already gone");
        let factory = MockConnectionFactory::new(service);
        let listeners: Vec<Box<dyn ReleaseListener<TestReleaseResponse>>> =
            vec![Box::new(LogListener)];
        let config = TestConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        let result = run(&config, &factory, &listeners).await;

        // The close failure is attached; the failed run stays the primary
        match result {
            Err(TaskError::Suppressed { primary, .. }) => {
                assert!(matches!(*primary, TaskError::FailedRun { .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cleanup_flag_forwarded() {
        let factory = MockConnectionFactory::default();
        let listeners: Vec<Box<dyn ReleaseListener<TestReleaseResponse>>> =
            vec![Box::new(LogListener)];
        let config = TestConfig {
            release_name: "myapp".to_string(),
            cleanup: true,
            ..Default::default()
        };

        run(&config, &factory, &listeners).await.unwrap();

        let requests = factory.service().test_requests();
        assert!(requests[0].cleanup);
        assert_eq!(requests[0].timeout_secs, 300);
    }
}
