//! Upgrade task - update an existing release from a chart

use capstan_client::{ConnectionFactory, ReleaseService, UpdateReleaseRequest};
use capstan_core::{Chart, validate_release_name};
use serde::Deserialize;
use url::Url;

use super::{default_timeout, finish};
use crate::context::BuildContext;
use crate::error::{Result, TaskError};
use crate::event::Operation;
use crate::source;

/// Configuration for the upgrade task
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeConfig {
    #[serde(default)]
    pub skip: bool,

    /// Chart to upgrade to; defaults to the build's generated chart directory
    ///
    /// Unlike install, a missing default chart source is always a hard error.
    #[serde(default)]
    pub chart_url: Option<Url>,

    /// Release to upgrade
    pub release_name: String,

    /// Discard previously supplied values and start from chart defaults
    #[serde(default)]
    pub reset_values: bool,

    /// Merge the previous revision's values under the supplied ones
    ///
    /// Forwarded verbatim alongside `resetValues`; the service owns the
    /// conflict resolution.
    #[serde(default)]
    pub reuse_values: bool,

    /// Inline YAML values; wins over `valuesUrl` when non-empty
    #[serde(default)]
    pub values_yaml: Option<String>,

    /// URL of a YAML values document
    #[serde(default)]
    pub values_url: Option<Url>,

    /// Force resource replacement on conflicts
    #[serde(default)]
    pub force: bool,

    /// Recreate pods after the upgrade
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

impl Default for UpgradeConfig {
    fn default() -> Self {
        Self {
            skip: false,
            chart_url: None,
            release_name: String::new(),
            reset_values: false,
            reuse_values: false,
            values_yaml: None,
            values_url: None,
            force: false,
            recreate: false,
            disable_hooks: false,
            dry_run: false,
            timeout: default_timeout(),
            wait: false,
        }
    }
}

/// Run the upgrade task
pub async fn run<F>(config: &UpgradeConfig, context: &BuildContext, factory: &F) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping upgrade by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    let chart = match &config.chart_url {
        Some(url) => source::load_chart(url).await?,
        None => {
            let chart_dir = context.default_chart_dir();
            if !chart_dir.is_dir() {
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

    let request = UpdateReleaseRequest {
        name: config.release_name.clone(),
        reset_values: config.reset_values,
        reuse_values: config.reuse_values,
        force: config.force,
        recreate: config.recreate,
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
    let result = update_release(&service, chart, request).await;
    finish(service, result).await
}

async fn update_release<S: ReleaseService>(
    service: &S,
    chart: Chart,
    request: UpdateReleaseRequest,
) -> Result<()> {
    tracing::info!(name = %request.name, "updating release");
    let response = service
        .update(chart, request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Upgrade,
            source,
        })?;
    tracing::info!(
        name = %response.release.name,
        revision = response.release.revision,
        "updated release"
    );
    Ok(())
}
