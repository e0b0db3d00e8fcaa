//! Upgrade command - update an existing release from the configured chart

use capstan_client::RemoteConnectionFactory;
use capstan_tasks::BuildContext;
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(
    document: &TaskDocument,
    context: &BuildContext,
    release_name: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let mut config = document.upgrade.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if dry_run {
        config.dry_run = true;
    }

    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::upgrade::run(&config, context, &factory).await?;

    println!("{} upgrade finished", style("✓").green().bold());
    Ok(())
}
