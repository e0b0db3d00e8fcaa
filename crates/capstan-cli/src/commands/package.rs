//! Package command - write the configured chart as an archive

use capstan_tasks::{BuildContext, PackageConfig};
use console::style;
use url::Url;

use crate::config::TaskDocument;
use crate::error::{CliError, Result};

pub async fn run(
    document: &TaskDocument,
    context: &BuildContext,
    chart_url: Option<&Url>,
    target_url: Option<&Url>,
) -> Result<()> {
    let mut config = match (&document.package, chart_url) {
        (Some(section), _) => section.clone(),
        (None, Some(url)) => PackageConfig {
            skip: false,
            chart_url: url.clone(),
            target_url: None,
        },
        (None, None) => {
            return Err(CliError::config_with_help(
                "no chart to package",
                "add a 'package:' section to the task document or pass --chart-url",
            ));
        }
    };
    if let Some(url) = chart_url {
        config.chart_url = url.clone();
    }
    if let Some(url) = target_url {
        config.target_url = Some(url.clone());
    }

    capstan_tasks::package::run(&config, context).await?;

    println!("{} package finished", style("✓").green().bold());
    Ok(())
}
