//! Capstan Client - the release-service seam
//!
//! This crate provides:
//! - **Request/response model**: immutable values exchanged with the service
//! - **`ReleaseService`**: the trait behind which the remote service sits
//! - **`ConnectionFactory`**: one connection per task invocation
//! - **Endpoint discovery**: find the service pod by label selector
//! - **Remote transport**: JSON over HTTP, with streamed list/test responses
//! - **Mock service**: an in-memory recording double for tests

pub mod endpoint;
pub mod error;
pub mod mock;
pub mod remote;
pub mod request;
pub mod response;
pub mod service;

pub use endpoint::{DEFAULT_NAMESPACE, DEFAULT_PORT, ServiceEndpoint};
pub use error::{ClientError, Result};
pub use mock::{MockConnectionFactory, MockReleaseService, OperationCounts};
pub use remote::{RemoteConnectionFactory, RemoteReleaseService};
pub use request::{
    InstallReleaseRequest, ListReleasesRequest, ReleaseContentRequest, ReleaseHistoryRequest,
    ReleaseStatusRequest, RollbackReleaseRequest, SortBy, SortOrder, TestReleaseRequest,
    UninstallReleaseRequest, UpdateReleaseRequest,
};
pub use response::{
    InstallReleaseResponse, ListReleasesResponse, ReleaseContentResponse, ReleaseHistoryResponse,
    ReleaseInfo, ReleaseStatus, ReleaseStatusResponse, RollbackReleaseResponse, TestReleaseResponse,
    TestRunStatus, UninstallReleaseResponse, UpdateReleaseResponse,
};
pub use service::{ConnectionFactory, ReleaseService, ResponseStream};
