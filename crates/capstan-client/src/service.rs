//! The release-service seam
//!
//! [`ReleaseService`] is the opaque collaborator performing actual release
//! operations against a cluster. Tasks are generic over it; tests substitute
//! the in-memory mock, production uses the remote transport.

use async_trait::async_trait;
use capstan_core::Chart;
use futures::stream::BoxStream;

use crate::error::Result;
use crate::request::{
    InstallReleaseRequest, ListReleasesRequest, ReleaseContentRequest, ReleaseHistoryRequest,
    ReleaseStatusRequest, RollbackReleaseRequest, TestReleaseRequest, UninstallReleaseRequest,
    UpdateReleaseRequest,
};
use crate::response::{
    InstallReleaseResponse, ListReleasesResponse, ReleaseContentResponse, ReleaseHistoryResponse,
    ReleaseStatusResponse, RollbackReleaseResponse, TestReleaseResponse, UninstallReleaseResponse,
    UpdateReleaseResponse,
};

/// A lazily produced sequence of responses
///
/// Consumers may stop polling early; no further elements are produced once
/// the stream is dropped.
pub type ResponseStream<'a, T> = BoxStream<'a, Result<T>>;

/// Operations exposed by the remote release-management service
///
/// Every method performs exactly one remote operation. `list` and `test`
/// answer with bounded response streams; everything else is unary.
#[async_trait]
pub trait ReleaseService: Send + Sync {
    /// Install a chart, creating a new release
    async fn install(
        &self,
        chart: Chart,
        request: InstallReleaseRequest,
    ) -> Result<InstallReleaseResponse>;

    /// Update an existing release from a chart
    async fn update(
        &self,
        chart: Chart,
        request: UpdateReleaseRequest,
    ) -> Result<UpdateReleaseResponse>;

    /// Roll a release back to an earlier revision
    async fn rollback(&self, request: RollbackReleaseRequest) -> Result<RollbackReleaseResponse>;

    /// Uninstall a release
    async fn uninstall(&self, request: UninstallReleaseRequest)
    -> Result<UninstallReleaseResponse>;

    /// Fetch the status of a release revision
    async fn status(&self, request: ReleaseStatusRequest) -> Result<ReleaseStatusResponse>;

    /// Fetch the stored content (manifest, values) of a release revision
    async fn content(&self, request: ReleaseContentRequest) -> Result<ReleaseContentResponse>;

    /// Fetch the revision history of a release
    async fn history(&self, request: ReleaseHistoryRequest) -> Result<ReleaseHistoryResponse>;

    /// Enumerate releases, one page per stream element
    fn list(&self, request: ListReleasesRequest) -> ResponseStream<'_, ListReleasesResponse>;

    /// Run release tests, one result per stream element
    fn test(&self, request: TestReleaseRequest) -> ResponseStream<'_, TestReleaseResponse>;

    /// Release the underlying connection
    ///
    /// Idempotent; safe to call after a failed operation.
    async fn close(&self) -> Result<()>;
}

/// Builds one service connection per task invocation
#[async_trait]
pub trait ConnectionFactory: Send + Sync {
    type Service: ReleaseService;

    /// Construct the cluster client and bind a service handle to it
    async fn connect(&self) -> Result<Self::Service>;

    /// The namespace the cluster client is configured with, if any
    ///
    /// Used as a fallback when a task has no namespace of its own.
    fn namespace(&self) -> Option<&str> {
        None
    }
}
