//! Response model for release-service operations

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a release revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseStatus {
    /// Status could not be determined
    #[default]
    Unknown,

    /// Revision is live on the cluster
    Deployed,

    /// Revision was uninstalled
    Deleted,

    /// Revision was replaced by a newer one
    Superseded,

    /// Revision failed to apply
    Failed,

    /// Uninstall is in progress
    Deleting,

    PendingInstall,
    PendingUpgrade,
    PendingRollback,
}

impl std::fmt::Display for ReleaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Deployed => write!(f, "deployed"),
            Self::Deleted => write!(f, "deleted"),
            Self::Superseded => write!(f, "superseded"),
            Self::Failed => write!(f, "failed"),
            Self::Deleting => write!(f, "deleting"),
            Self::PendingInstall => write!(f, "pending-install"),
            Self::PendingUpgrade => write!(f, "pending-upgrade"),
            Self::PendingRollback => write!(f, "pending-rollback"),
        }
    }
}

/// Summary of one release revision as reported by the service
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseInfo {
    /// Release name
    pub name: String,

    /// Namespace the release lives in
    #[serde(default)]
    pub namespace: String,

    /// Revision number (1-based)
    #[serde(default)]
    pub revision: u32,

    /// Lifecycle status
    #[serde(default)]
    pub status: ReleaseStatus,

    /// Name of the chart that produced this revision
    #[serde(default)]
    pub chart_name: Option<String>,

    /// Version of the chart that produced this revision
    #[serde(default)]
    pub chart_version: Option<String>,

    /// Human-readable status description
    #[serde(default)]
    pub description: Option<String>,

    /// When the revision was last updated
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallReleaseResponse {
    pub release: ReleaseInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReleaseResponse {
    pub release: ReleaseInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackReleaseResponse {
    pub release: ReleaseInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallReleaseResponse {
    pub release: ReleaseInfo,

    /// Additional information reported by the service (e.g. kept resources)
    #[serde(default)]
    pub info: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseStatusResponse {
    pub release: ReleaseInfo,

    /// Resource summary for the revision
    #[serde(default)]
    pub resources: Option<String>,

    /// Rendered notes for the revision
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseContentResponse {
    pub release: ReleaseInfo,

    /// The manifest the revision applied
    #[serde(default)]
    pub manifest: String,

    /// The effective values the revision was rendered with
    #[serde(default)]
    pub values_yaml: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseHistoryResponse {
    /// Revisions, newest first
    #[serde(default)]
    pub releases: Vec<ReleaseInfo>,
}

/// One page of a release listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReleasesResponse {
    /// Releases on this page
    #[serde(default)]
    pub releases: Vec<ReleaseInfo>,

    /// Number of releases on this page
    #[serde(default)]
    pub count: u64,

    /// Total number of releases matching the query
    #[serde(default)]
    pub total: u64,

    /// Continuation token for the next page
    #[serde(default)]
    pub next: Option<String>,
}

/// Outcome of a single test run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TestRunStatus {
    #[default]
    Unknown,
    Running,
    Success,
    Failure,
}

impl std::fmt::Display for TestRunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Running => write!(f, "running"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// One streamed test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReleaseResponse {
    /// Message reported by the test run
    #[serde(default)]
    pub msg: String,

    /// Status of the test run
    #[serde(default)]
    pub status: TestRunStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_info_camel_case() {
        let json = r#"{
            "name": "myapp",
            "namespace": "prod",
            "revision": 4,
            "status": "deployed",
            "chartName": "myapp",
            "chartVersion": "1.2.3"
        }"#;
        let info: ReleaseInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.name, "myapp");
        assert_eq!(info.revision, 4);
        assert_eq!(info.status, ReleaseStatus::Deployed);
        assert_eq!(info.chart_name.as_deref(), Some("myapp"));
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&ReleaseStatus::PendingInstall).unwrap(),
            "\"pending-install\""
        );
        assert_eq!(
            serde_json::from_str::<ReleaseStatus>("\"superseded\"").unwrap(),
            ReleaseStatus::Superseded
        );
    }

    #[test]
    fn test_test_response_defaults() {
        let response: TestReleaseResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.status, TestRunStatus::Unknown);
        assert!(response.msg.is_empty());
    }
}
