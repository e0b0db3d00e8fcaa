//! Rollback task - return a release to an earlier revision

use capstan_client::{ConnectionFactory, ReleaseService, RollbackReleaseRequest};
use capstan_core::validate_release_name;
use serde::Deserialize;

use super::{default_timeout, finish};
use crate::error::{Result, TaskError};
use crate::event::Operation;

/// Configuration for the rollback task
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollbackConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release to roll back
    pub release_name: String,

    /// Target revision; 0 means the previous revision
    #[serde(default)]
    pub version: u32,

    /// Force resource replacement on conflicts
    #[serde(default)]
    pub force: bool,

    /// Recreate pods after the rollback
    #[serde(default)]
    pub recreate: bool,

    #[serde(default)]
    pub disable_hooks: bool,

    #[serde(default)]
    pub dry_run: bool,

    /// Operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub wait: bool,
}

impl Default for RollbackConfig {
    fn default() -> Self {
        Self {
            skip: false,
            release_name: String::new(),
            version: 0,
            force: false,
            recreate: false,
            disable_hooks: false,
            dry_run: false,
            timeout: default_timeout(),
            wait: false,
        }
    }
}

/// Run the rollback task
pub async fn run<F>(config: &RollbackConfig, factory: &F) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping rollback by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    let request = RollbackReleaseRequest {
        name: config.release_name.clone(),
        version: config.version,
        force: config.force,
        recreate: config.recreate,
        timeout_secs: config.timeout,
        wait: config.wait,
        dry_run: config.dry_run,
        disable_hooks: config.disable_hooks,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = rollback_release(&service, request).await;
    finish(service, result).await
}

async fn rollback_release<S: ReleaseService>(
    service: &S,
    request: RollbackReleaseRequest,
) -> Result<()> {
    tracing::info!(name = %request.name, version = request.version, "rolling back release");
    let response = service
        .rollback(request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Rollback,
            source,
        })?;
    tracing::info!(
        name = %response.release.name,
        revision = response.release.revision,
        "rolled back release"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_client::MockConnectionFactory;

    #[tokio::test]
    async fn test_rollback_forwards_version() {
        let factory = MockConnectionFactory::default();
        let config = RollbackConfig {
            release_name: "myapp".to_string(),
            version: 3,
            wait: true,
            ..Default::default()
        };

        run(&config, &factory).await.unwrap();

        let requests = factory.service().rollback_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].version, 3);
        assert!(requests[0].wait);
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_connecting() {
        let factory = MockConnectionFactory::default();
        let config = RollbackConfig {
            release_name: "Bad Name".to_string(),
            ..Default::default()
        };

        let result = run(&config, &factory).await;

        assert!(matches!(result, Err(TaskError::Config(_))));
        assert_eq!(factory.connection_count(), 0);
    }

    #[test]
    fn test_config_rejects_negative_version() {
        let result = serde_yaml::from_str::<RollbackConfig>(
            "releaseName: myapp\nversion: -1\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_version_defaults_to_previous() {
        let config: RollbackConfig = serde_yaml::from_str("releaseName: myapp\n").unwrap();
        assert_eq!(config.version, 0);
    }
}
