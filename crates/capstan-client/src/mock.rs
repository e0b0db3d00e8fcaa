//! Mock release service for testing
//!
//! Records every request verbatim, replays queued responses, and counts
//! operations, so tests can assert on exactly what a task sent without a
//! cluster or a running service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use capstan_core::Chart;
use futures::stream::{self, StreamExt};

use crate::error::{ClientError, Result};
use crate::request::{
    InstallReleaseRequest, ListReleasesRequest, ReleaseContentRequest, ReleaseHistoryRequest,
    ReleaseStatusRequest, RollbackReleaseRequest, TestReleaseRequest, UninstallReleaseRequest,
    UpdateReleaseRequest,
};
use crate::response::{
    InstallReleaseResponse, ListReleasesResponse, ReleaseContentResponse, ReleaseHistoryResponse,
    ReleaseInfo, ReleaseStatus, ReleaseStatusResponse, RollbackReleaseResponse,
    TestReleaseResponse, UninstallReleaseResponse, UpdateReleaseResponse,
};
use crate::service::{ConnectionFactory, ReleaseService, ResponseStream};

/// Counts of operations performed, for testing assertions
#[derive(Debug, Default, Clone)]
pub struct OperationCounts {
    pub installs: usize,
    pub updates: usize,
    pub rollbacks: usize,
    pub uninstalls: usize,
    pub statuses: usize,
    pub contents: usize,
    pub histories: usize,
    pub lists: usize,
    pub tests: usize,
    pub closes: usize,
}

impl OperationCounts {
    /// Total number of remote operations (close not included)
    pub fn remote_calls(&self) -> usize {
        self.installs
            + self.updates
            + self.rollbacks
            + self.uninstalls
            + self.statuses
            + self.contents
            + self.histories
            + self.lists
            + self.tests
    }
}

#[derive(Default)]
struct MockState {
    counts: OperationCounts,

    // Requests, recorded verbatim in call order
    install_requests: Vec<InstallReleaseRequest>,
    update_requests: Vec<UpdateReleaseRequest>,
    rollback_requests: Vec<RollbackReleaseRequest>,
    uninstall_requests: Vec<UninstallReleaseRequest>,
    status_requests: Vec<ReleaseStatusRequest>,
    content_requests: Vec<ReleaseContentRequest>,
    history_requests: Vec<ReleaseHistoryRequest>,
    list_requests: Vec<ListReleasesRequest>,
    test_requests: Vec<TestReleaseRequest>,

    /// Names of charts shipped with install/update calls
    chart_names: Vec<String>,

    // Canned answers
    release: Option<ReleaseInfo>,
    history: Option<ReleaseHistoryResponse>,
    content: Option<ReleaseContentResponse>,
    list_pages: Vec<ListReleasesResponse>,
    test_results: Vec<TestReleaseResponse>,

    close_error: Option<String>,
}

/// In-memory release service double
#[derive(Clone, Default)]
pub struct MockReleaseService {
    state: Arc<RwLock<MockState>>,

    /// Number of stream elements actually produced by `test`
    test_responses_produced: Arc<AtomicUsize>,
}

impl MockReleaseService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer unary operations with this release
    pub fn with_release(self, release: ReleaseInfo) -> Self {
        self.state.write().unwrap().release = Some(release);
        self
    }

    /// Answer `history` with this response
    pub fn with_history(self, history: ReleaseHistoryResponse) -> Self {
        self.state.write().unwrap().history = Some(history);
        self
    }

    /// Answer `content` with this response
    pub fn with_content(self, content: ReleaseContentResponse) -> Self {
        self.state.write().unwrap().content = Some(content);
        self
    }

    /// Answer `list` with these pages, in order
    pub fn with_list_pages(self, pages: Vec<ListReleasesResponse>) -> Self {
        self.state.write().unwrap().list_pages = pages;
        self
    }

    /// Answer `test` with these results, in order
    pub fn with_test_results(self, results: Vec<TestReleaseResponse>) -> Self {
        self.state.write().unwrap().test_results = results;
        self
    }

    /// Make `close` fail with the given message
    pub fn with_close_error(self, message: impl Into<String>) -> Self {
        self.state.write().unwrap().close_error = Some(message.into());
        self
    }

    pub fn operation_counts(&self) -> OperationCounts {
        self.state.read().unwrap().counts.clone()
    }

    pub fn install_requests(&self) -> Vec<InstallReleaseRequest> {
        self.state.read().unwrap().install_requests.clone()
    }

    pub fn update_requests(&self) -> Vec<UpdateReleaseRequest> {
        self.state.read().unwrap().update_requests.clone()
    }

    pub fn rollback_requests(&self) -> Vec<RollbackReleaseRequest> {
        self.state.read().unwrap().rollback_requests.clone()
    }

    pub fn uninstall_requests(&self) -> Vec<UninstallReleaseRequest> {
        self.state.read().unwrap().uninstall_requests.clone()
    }

    pub fn status_requests(&self) -> Vec<ReleaseStatusRequest> {
        self.state.read().unwrap().status_requests.clone()
    }

    pub fn content_requests(&self) -> Vec<ReleaseContentRequest> {
        self.state.read().unwrap().content_requests.clone()
    }

    pub fn history_requests(&self) -> Vec<ReleaseHistoryRequest> {
        self.state.read().unwrap().history_requests.clone()
    }

    pub fn list_requests(&self) -> Vec<ListReleasesRequest> {
        self.state.read().unwrap().list_requests.clone()
    }

    pub fn test_requests(&self) -> Vec<TestReleaseRequest> {
        self.state.read().unwrap().test_requests.clone()
    }

    /// Names of charts shipped with install/update calls
    pub fn chart_names(&self) -> Vec<String> {
        self.state.read().unwrap().chart_names.clone()
    }

    /// How many `test` stream elements were actually consumed
    pub fn test_responses_produced(&self) -> usize {
        self.test_responses_produced.load(Ordering::SeqCst)
    }

    fn release_for(&self, name: Option<&str>) -> ReleaseInfo {
        self.state
            .read()
            .unwrap()
            .release
            .clone()
            .unwrap_or_else(|| ReleaseInfo {
                name: name.unwrap_or("generated-release").to_string(),
                namespace: "default".to_string(),
                revision: 1,
                status: ReleaseStatus::Deployed,
                ..Default::default()
            })
    }
}

#[async_trait]
impl ReleaseService for MockReleaseService {
    async fn install(
        &self,
        chart: Chart,
        request: InstallReleaseRequest,
    ) -> Result<InstallReleaseResponse> {
        let release = self.release_for(request.name.as_deref());
        let mut state = self.state.write().unwrap();
        state.counts.installs += 1;
        state.chart_names.push(chart.metadata.name.clone());
        state.install_requests.push(request);
        Ok(InstallReleaseResponse { release })
    }

    async fn update(
        &self,
        chart: Chart,
        request: UpdateReleaseRequest,
    ) -> Result<UpdateReleaseResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.updates += 1;
        state.chart_names.push(chart.metadata.name.clone());
        state.update_requests.push(request);
        Ok(UpdateReleaseResponse { release })
    }

    async fn rollback(&self, request: RollbackReleaseRequest) -> Result<RollbackReleaseResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.rollbacks += 1;
        state.rollback_requests.push(request);
        Ok(RollbackReleaseResponse { release })
    }

    async fn uninstall(
        &self,
        request: UninstallReleaseRequest,
    ) -> Result<UninstallReleaseResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.uninstalls += 1;
        state.uninstall_requests.push(request);
        Ok(UninstallReleaseResponse {
            release,
            info: None,
        })
    }

    async fn status(&self, request: ReleaseStatusRequest) -> Result<ReleaseStatusResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.statuses += 1;
        state.status_requests.push(request);
        Ok(ReleaseStatusResponse {
            release,
            resources: None,
            notes: None,
        })
    }

    async fn content(&self, request: ReleaseContentRequest) -> Result<ReleaseContentResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.contents += 1;
        state.content_requests.push(request);
        Ok(state
            .content
            .clone()
            .unwrap_or_else(|| ReleaseContentResponse {
                release,
                manifest: String::new(),
                values_yaml: None,
            }))
    }

    async fn history(&self, request: ReleaseHistoryRequest) -> Result<ReleaseHistoryResponse> {
        let release = self.release_for(Some(&request.name));
        let mut state = self.state.write().unwrap();
        state.counts.histories += 1;
        state.history_requests.push(request);
        Ok(state
            .history
            .clone()
            .unwrap_or_else(|| ReleaseHistoryResponse {
                releases: vec![release],
            }))
    }

    fn list(&self, request: ListReleasesRequest) -> ResponseStream<'_, ListReleasesResponse> {
        let pages = {
            let mut state = self.state.write().unwrap();
            state.counts.lists += 1;
            state.list_requests.push(request);
            state.list_pages.clone()
        };
        stream::iter(pages.into_iter().map(Ok)).boxed()
    }

    fn test(&self, request: TestReleaseRequest) -> ResponseStream<'_, TestReleaseResponse> {
        let results = {
            let mut state = self.state.write().unwrap();
            state.counts.tests += 1;
            state.test_requests.push(request);
            state.test_results.clone()
        };
        let produced = Arc::clone(&self.test_responses_produced);
        // Count lazily, as elements are pulled, so tests can assert that an
        // aborted consumer never produced the tail of the stream.
        stream::iter(results)
            .map(move |result| {
                produced.fetch_add(1, Ordering::SeqCst);
                Ok(result)
            })
            .boxed()
    }

    async fn close(&self) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.counts.closes += 1;
        match &state.close_error {
            Some(message) => Err(ClientError::Close {
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Spy connection factory handing out clones of one mock service
#[derive(Clone, Default)]
pub struct MockConnectionFactory {
    service: MockReleaseService,
    namespace: Option<String>,
    connections: Arc<AtomicUsize>,
}

impl MockConnectionFactory {
    pub fn new(service: MockReleaseService) -> Self {
        Self {
            service,
            namespace: None,
            connections: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Report this as the cluster client's configured namespace
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// The service handed out by `connect`
    pub fn service(&self) -> &MockReleaseService {
        &self.service
    }

    /// How many connections were built
    pub fn connection_count(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionFactory for MockConnectionFactory {
    type Service = MockReleaseService;

    async fn connect(&self) -> Result<MockReleaseService> {
        self.connections.fetch_add(1, Ordering::SeqCst);
        Ok(self.service.clone())
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[tokio::test]
    async fn test_mock_records_requests() {
        let service = MockReleaseService::new();

        let request = UninstallReleaseRequest {
            name: "myapp".to_string(),
            purge: true,
            ..Default::default()
        };
        service.uninstall(request.clone()).await.unwrap();

        assert_eq!(service.uninstall_requests(), vec![request]);
        assert_eq!(service.operation_counts().uninstalls, 1);
    }

    #[tokio::test]
    async fn test_mock_synthesizes_release_from_request() {
        let service = MockReleaseService::new();

        let response = service
            .status(ReleaseStatusRequest {
                name: "myapp".to_string(),
                version: 0,
            })
            .await
            .unwrap();

        assert_eq!(response.release.name, "myapp");
        assert_eq!(response.release.status, ReleaseStatus::Deployed);
    }

    #[tokio::test]
    async fn test_mock_test_stream_counts_lazily() {
        let service = MockReleaseService::new().with_test_results(vec![
            TestReleaseResponse {
                msg: "one".to_string(),
                status: crate::response::TestRunStatus::Success,
            },
            TestReleaseResponse {
                msg: "two".to_string(),
                status: crate::response::TestRunStatus::Success,
            },
        ]);

        let mut stream = service.test(TestReleaseRequest::default());
        let first = stream.try_next().await.unwrap().unwrap();
        assert_eq!(first.msg, "one");
        assert_eq!(service.test_responses_produced(), 1);

        drop(stream);
        // The second element was never pulled
        assert_eq!(service.test_responses_produced(), 1);
    }

    #[tokio::test]
    async fn test_factory_counts_connections() {
        let factory = MockConnectionFactory::default();
        assert_eq!(factory.connection_count(), 0);

        factory.connect().await.unwrap();
        factory.connect().await.unwrap();
        assert_eq!(factory.connection_count(), 2);
    }

    #[tokio::test]
    async fn test_close_error_injection() {
        let service = MockReleaseService::new().with_close_error("socket already gone");
        let result = service.close().await;
        assert!(matches!(result, Err(ClientError::Close { .. })));
        assert_eq!(service.operation_counts().closes, 1);
    }
}
