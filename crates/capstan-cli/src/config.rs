//! The task document
//!
//! A single YAML document (by default `capstan.yaml`) with one optional
//! section per task kind, plus the release-service endpoint. Sections bind
//! to the task configuration records unchanged.

use std::path::Path;

use capstan_client::ServiceEndpoint;
use capstan_tasks::{
    ContentConfig, HistoryConfig, InstallConfig, ListConfig, PackageConfig, RollbackConfig,
    StatusConfig, TestConfig, UninstallConfig, UpgradeConfig,
};
use serde::Deserialize;

use crate::error::{CliError, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDocument {
    /// Where the release service lives; defaults apply per field
    #[serde(default)]
    pub service: Option<ServiceEndpoint>,

    #[serde(default)]
    pub install: Option<InstallConfig>,

    #[serde(default)]
    pub upgrade: Option<UpgradeConfig>,

    #[serde(default)]
    pub rollback: Option<RollbackConfig>,

    #[serde(default)]
    pub uninstall: Option<UninstallConfig>,

    #[serde(default)]
    pub status: Option<StatusConfig>,

    #[serde(default)]
    pub content: Option<ContentConfig>,

    #[serde(default)]
    pub history: Option<HistoryConfig>,

    #[serde(default)]
    pub list: Option<ListConfig>,

    #[serde(default)]
    pub test: Option<TestConfig>,

    #[serde(default)]
    pub package: Option<PackageConfig>,
}

impl TaskDocument {
    /// Load the document; a missing file yields an empty document
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content).map_err(|e| {
            CliError::document(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// The configured endpoint, or the well-known defaults
    pub fn service_endpoint(&self) -> ServiceEndpoint {
        self.service.clone().unwrap_or_default()
    }
}
