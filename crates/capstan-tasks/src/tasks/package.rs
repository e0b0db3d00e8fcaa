//! Package task - write a chart as a gzip-compressed archive
//!
//! The only task that never talks to the release service.

use std::io::BufWriter;

use capstan_core::default_archive_name;
use serde::Deserialize;
use url::Url;

use crate::context::BuildContext;
use crate::error::{Result, TaskError};
use crate::source;

/// Configuration for the package task
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConfig {
    #[serde(default)]
    pub skip: bool,

    /// Chart to package (a directory or an already packaged archive)
    pub chart_url: Url,

    /// Where to write the archive; defaults to
    /// `<build_dir>/charts/<name>-<version>.tgz`
    #[serde(default)]
    pub target_url: Option<Url>,
}

/// Run the package task
pub async fn run(config: &PackageConfig, context: &BuildContext) -> Result<()> {
    if config.skip {
        tracing::debug!("skipping package by request");
        return Ok(());
    }

    let chart = source::load_chart(&config.chart_url).await?;

    let target_path = match &config.target_url {
        Some(url) => {
            if url.scheme() != "file" {
                return Err(TaskError::UnsupportedScheme {
                    scheme: url.scheme().to_string(),
                    url: url.clone(),
                });
            }
            source::to_file_path(url)?
        }
        None => context.charts_dir().join(default_archive_name(&chart)),
    };

    if let Some(parent) = target_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(&target_path)?;
    capstan_core::write_chart(&chart, BufWriter::new(file)).map_err(TaskError::Chart)?;

    tracing::info!(
        chart = chart.name(),
        target = %target_path.display(),
        "packaged chart"
    );
    Ok(())
}
