//! Install task - create a release from a chart

use capstan_client::{ConnectionFactory, InstallReleaseRequest, ReleaseService};
use capstan_core::{Chart, validate_namespace, validate_release_name};
use serde::Deserialize;
use url::Url;

use super::{default_timeout, finish};
use crate::context::BuildContext;
use crate::error::{Result, TaskError};
use crate::event::Operation;
use crate::source;

/// Configuration for the install task
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// Do nothing when set
    #[serde(default)]
    pub skip: bool,

    /// Chart to install; defaults to the build's generated chart directory
    #[serde(default)]
    pub chart_url: Option<Url>,

    /// Treat a missing default chart source as a no-op instead of an error
    #[serde(default)]
    pub lenient: bool,

    /// Release name; blank means the service generates one
    #[serde(default)]
    pub release_name: Option<String>,

    /// Namespace the release is installed into
    #[serde(default)]
    pub release_namespace: Option<String>,

    /// Reuse the release name across repeated installations
    ///
    /// Not recommended outside throwaway environments.
    #[serde(default)]
    pub reuse_release_name: bool,

    /// Inline YAML values; wins over `valuesUrl` when non-empty
    #[serde(default)]
    pub values_yaml: Option<String>,

    /// URL of a YAML values document
    #[serde(default)]
    pub values_url: Option<Url>,

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

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            skip: false,
            chart_url: None,
            lenient: false,
            release_name: None,
            release_namespace: None,
            reuse_release_name: false,
            values_yaml: None,
            values_url: None,
            disable_hooks: false,
            dry_run: false,
            timeout: default_timeout(),
            wait: false,
        }
    }
}

/// Run the install task
pub async fn run<F>(config: &InstallConfig, context: &BuildContext, factory: &F) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping install by request");
        return Ok(());
    }

    // A blank name is legal here: the service generates one.
    if let Some(name) = config.release_name.as_deref() {
        if !name.is_empty() {
            validate_release_name(name).map_err(TaskError::Config)?;
        }
    }
    if let Some(namespace) = config.release_namespace.as_deref() {
        validate_namespace(namespace).map_err(TaskError::Config)?;
    }

    let chart = match &config.chart_url {
        Some(url) => source::load_chart(url).await?,
        None => {
            let chart_dir = context.default_chart_dir();
            if !chart_dir.is_dir() {
                if config.lenient {
                    tracing::warn!(
                        chart_dir = %chart_dir.display(),
                        "non-existent default chart source; skipping install"
                    );
                    return Ok(());
                }
                return Err(TaskError::ChartNotFound {
                    location: chart_dir.display().to_string(),
                });
            }
            Chart::load_dir(&chart_dir).map_err(TaskError::Chart)?
        }
    };
    tracing::debug!(chart = chart.name(), "loaded chart");

    let values_yaml =
        source::resolve_values(config.values_yaml.as_deref(), config.values_url.as_ref()).await?;

    let request = InstallReleaseRequest {
        name: config.release_name.clone().filter(|n| !n.is_empty()),
        namespace: config.release_namespace.clone(),
        reuse_name: config.reuse_release_name,
        timeout_secs: config.timeout,
        wait: config.wait,
        dry_run: config.dry_run,
        disable_hooks: config.disable_hooks,
        values_yaml,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = install_release(&service, chart, request).await;
    finish(service, result).await
}

async fn install_release<S: ReleaseService>(
    service: &S,
    chart: Chart,
    request: InstallReleaseRequest,
) -> Result<()> {
    tracing::info!(
        name = request.name.as_deref().unwrap_or("<generated>"),
        "installing release"
    );
    let response = service
        .install(chart, request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Install,
            source,
        })?;
    tracing::info!(
        name = %response.release.name,
        revision = response.release.revision,
        "installed release"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_client::{MockConnectionFactory, MockReleaseService};
    use tempfile::TempDir;

    fn context_with_chart(temp: &TempDir) -> BuildContext {
        let context = BuildContext::new(temp.path(), "myapp");
        let chart_dir = context.default_chart_dir();
        std::fs::create_dir_all(&chart_dir).unwrap();
        std::fs::write(chart_dir.join("Chart.yaml"), "name: myapp\nversion: 0.1.0\n").unwrap();
        context
    }

    #[tokio::test]
    async fn test_skip_does_nothing() {
        let temp = TempDir::new().unwrap();
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            skip: true,
            ..Default::default()
        };

        run(&config, &BuildContext::new(temp.path(), "myapp"), &factory)
            .await
            .unwrap();

        assert_eq!(factory.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_install_from_default_chart_dir() {
        let temp = TempDir::new().unwrap();
        let context = context_with_chart(&temp);
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            release_name: Some("myapp".to_string()),
            release_namespace: Some("prod".to_string()),
            wait: true,
            ..Default::default()
        };

        run(&config, &context, &factory).await.unwrap();

        assert_eq!(factory.connection_count(), 1);
        let requests = factory.service().install_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].name.as_deref(), Some("myapp"));
        assert_eq!(requests[0].namespace.as_deref(), Some("prod"));
        assert_eq!(requests[0].timeout_secs, 300);
        assert!(requests[0].wait);
        assert_eq!(factory.service().chart_names(), vec!["myapp"]);
        assert_eq!(factory.service().operation_counts().closes, 1);
    }

    #[tokio::test]
    async fn test_blank_name_is_omitted_from_request() {
        let temp = TempDir::new().unwrap();
        let context = context_with_chart(&temp);
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            release_name: Some(String::new()),
            ..Default::default()
        };

        run(&config, &context, &factory).await.unwrap();

        let requests = factory.service().install_requests();
        assert_eq!(requests[0].name, None);
    }

    #[tokio::test]
    async fn test_missing_default_chart_fails_before_connecting() {
        let temp = TempDir::new().unwrap();
        let factory = MockConnectionFactory::default();
        let config = InstallConfig::default();

        let result = run(&config, &BuildContext::new(temp.path(), "myapp"), &factory).await;

        assert!(matches!(result, Err(TaskError::ChartNotFound { .. })));
        assert_eq!(factory.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_default_chart_lenient_is_noop() {
        let temp = TempDir::new().unwrap();
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            lenient: true,
            ..Default::default()
        };

        run(&config, &BuildContext::new(temp.path(), "myapp"), &factory)
            .await
            .unwrap();

        assert_eq!(factory.connection_count(), 0);
        assert_eq!(factory.service().operation_counts().remote_calls(), 0);
    }

    #[tokio::test]
    async fn test_invalid_name_rejected_before_connecting() {
        let temp = TempDir::new().unwrap();
        let context = context_with_chart(&temp);
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            release_name: Some("Not-A-Valid-Name".to_string()),
            ..Default::default()
        };

        let result = run(&config, &context, &factory).await;

        assert!(matches!(result, Err(TaskError::Config(_))));
        assert_eq!(factory.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_inline_values_forwarded() {
        let temp = TempDir::new().unwrap();
        let context = context_with_chart(&temp);
        let factory = MockConnectionFactory::default();
        let config = InstallConfig {
            values_yaml: Some("replicas: 5\n".to_string()),
            ..Default::default()
        };

        run(&config, &context, &factory).await.unwrap();

        let requests = factory.service().install_requests();
        assert_eq!(requests[0].values_yaml.as_deref(), Some("replicas: 5\n"));
    }

    #[tokio::test]
    async fn test_close_failure_after_success_fails_the_task() {
        let temp = TempDir::new().unwrap();
        let context = context_with_chart(&temp);
        let service = MockReleaseService::new().with_close_error("socket already gone");
        let factory = MockConnectionFactory::new(service);
        let config = InstallConfig::default();

        let result = run(&config, &context, &factory).await;

        assert!(matches!(result, Err(TaskError::Close { .. })));
    }

    #[test]
    fn test_config_binding_defaults() {
        let config: InstallConfig = serde_yaml::from_str("releaseName: myapp\n").unwrap();

        assert_eq!(config.release_name.as_deref(), Some("myapp"));
        assert_eq!(config.timeout, 300);
        assert!(!config.skip);
        assert!(!config.lenient);
        assert!(!config.wait);
    }
}
