//! Rollback command - return a release to an earlier revision

use capstan_client::RemoteConnectionFactory;
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(
    document: &TaskDocument,
    release_name: Option<&str>,
    version: Option<u32>,
) -> Result<()> {
    let mut config = document.rollback.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if let Some(version) = version {
        config.version = version;
    }

    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::rollback::run(&config, &factory).await?;

    println!("{} rollback finished", style("✓").green().bold());
    Ok(())
}
