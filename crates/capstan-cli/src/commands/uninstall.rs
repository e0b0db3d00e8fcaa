//! Uninstall command - remove a release

use capstan_client::RemoteConnectionFactory;
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(document: &TaskDocument, release_name: Option<&str>, purge: bool) -> Result<()> {
    let mut config = document.uninstall.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if purge {
        config.purge = true;
    }

    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::uninstall::run(&config, &factory).await?;

    println!("{} uninstall finished", style("✓").green().bold());
    Ok(())
}
