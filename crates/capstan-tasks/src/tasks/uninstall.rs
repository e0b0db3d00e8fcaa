//! Uninstall task - remove a release

use capstan_client::{ConnectionFactory, ReleaseService, UninstallReleaseRequest};
use capstan_core::validate_release_name;
use serde::Deserialize;

use super::{default_timeout, finish};
use crate::error::{Result, TaskError};
use crate::event::Operation;

/// Configuration for the uninstall task
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UninstallConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release to uninstall
    pub release_name: String,

    /// Remove the release record entirely instead of a soft delete
    #[serde(default)]
    pub purge: bool,

    #[serde(default)]
    pub disable_hooks: bool,

    /// Operation timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for UninstallConfig {
    fn default() -> Self {
        Self {
            skip: false,
            release_name: String::new(),
            purge: false,
            disable_hooks: false,
            timeout: default_timeout(),
        }
    }
}

/// Run the uninstall task
pub async fn run<F>(config: &UninstallConfig, factory: &F) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping uninstall by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    let request = UninstallReleaseRequest {
        name: config.release_name.clone(),
        purge: config.purge,
        disable_hooks: config.disable_hooks,
        timeout_secs: config.timeout,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = uninstall_release(&service, request).await;
    finish(service, result).await
}

async fn uninstall_release<S: ReleaseService>(
    service: &S,
    request: UninstallReleaseRequest,
) -> Result<()> {
    tracing::info!(name = %request.name, purge = request.purge, "uninstalling release");
    let response = service
        .uninstall(request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Uninstall,
            source,
        })?;
    tracing::info!(name = %response.release.name, "uninstalled release");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_client::MockConnectionFactory;

    #[tokio::test]
    async fn test_purge_toggles_request() {
        let factory = MockConnectionFactory::default();
        let config = UninstallConfig {
            release_name: "myapp".to_string(),
            purge: true,
            ..Default::default()
        };

        run(&config, &factory).await.unwrap();

        let requests = factory.service().uninstall_requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].purge);
        assert_eq!(requests[0].timeout_secs, 300);
    }

    #[tokio::test]
    async fn test_soft_delete_is_the_default() {
        let factory = MockConnectionFactory::default();
        let config = UninstallConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory).await.unwrap();

        assert!(!factory.service().uninstall_requests()[0].purge);
    }

    #[tokio::test]
    async fn test_empty_name_rejected() {
        let factory = MockConnectionFactory::default();
        let config = UninstallConfig::default();

        let result = run(&config, &factory).await;

        assert!(matches!(result, Err(TaskError::Config(_))));
        assert_eq!(factory.connection_count(), 0);
    }
}
