//! Request model for release-service operations
//!
//! Requests are immutable values, built in one step from validated task
//! configuration and discarded after the call.

use serde::{Deserialize, Serialize};

use crate::response::ReleaseStatus;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReleaseRequest {
    /// Release name; absent means the service generates one
    #[serde(default)]
    pub name: Option<String>,

    /// Target namespace; absent means the service default
    #[serde(default)]
    pub namespace: Option<String>,

    /// Reuse the given name across repeated installations
    #[serde(default)]
    pub reuse_name: bool,

    /// Operation timeout in seconds
    #[serde(default)]
    pub timeout_secs: u64,

    /// Wait for resources to be ready before answering
    #[serde(default)]
    pub wait: bool,

    /// Render only; do not touch the cluster
    #[serde(default)]
    pub dry_run: bool,

    /// Skip lifecycle hooks
    #[serde(default)]
    pub disable_hooks: bool,

    /// Raw YAML values overriding the chart defaults
    #[serde(default)]
    pub values_yaml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReleaseRequest {
    /// Release to update
    pub name: String,

    /// Discard previously supplied values and start from chart defaults
    #[serde(default)]
    pub reset_values: bool,

    /// Merge the previous revision's values under the supplied ones
    ///
    /// Both flags are forwarded verbatim; how a conflicting combination is
    /// resolved is the service's business.
    #[serde(default)]
    pub reuse_values: bool,

    /// Force resource replacement on conflicts
    #[serde(default)]
    pub force: bool,

    /// Recreate pods after the update
    #[serde(default)]
    pub recreate: bool,

    #[serde(default)]
    pub timeout_secs: u64,

    #[serde(default)]
    pub wait: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub disable_hooks: bool,

    #[serde(default)]
    pub values_yaml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackReleaseRequest {
    /// Release to roll back
    pub name: String,

    /// Target revision; 0 means the previous revision
    #[serde(default)]
    pub version: u32,

    #[serde(default)]
    pub force: bool,

    #[serde(default)]
    pub recreate: bool,

    #[serde(default)]
    pub timeout_secs: u64,

    #[serde(default)]
    pub wait: bool,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub disable_hooks: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallReleaseRequest {
    /// Release to uninstall
    pub name: String,

    /// Remove the release record entirely instead of a soft delete
    #[serde(default)]
    pub purge: bool,

    #[serde(default)]
    pub disable_hooks: bool,

    #[serde(default)]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStatusRequest {
    pub name: String,

    /// Revision to inspect; 0 means the latest
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseContentRequest {
    pub name: String,

    /// Revision to fetch; 0 means the latest
    #[serde(default)]
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseHistoryRequest {
    pub name: String,

    /// Maximum number of revisions to return; 0 means unbounded
    #[serde(default)]
    pub max: u32,
}

/// Sort key for release listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Name,
    LastReleased,
    ChartName,
}

/// Sort direction for release listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReleasesRequest {
    /// Regular expression filtering release names
    #[serde(default)]
    pub filter: Option<String>,

    /// Maximum number of releases per page
    #[serde(default)]
    pub limit: u64,

    /// Continuation token from a previous page
    #[serde(default)]
    pub offset: Option<String>,

    /// Namespace to list in
    pub namespace: String,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Restrict the listing to releases in these states
    #[serde(default)]
    pub status_codes: Vec<ReleaseStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReleaseRequest {
    /// Release to test
    pub name: String,

    /// Delete test resources after the run
    #[serde(default)]
    pub cleanup: bool,

    #[serde(default)]
    pub timeout_secs: u64,
}
