//! Content command - log the stored manifest of a release revision

use capstan_client::{ReleaseContentResponse, RemoteConnectionFactory};
use capstan_tasks::{LogListener, ReleaseListener};
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(
    document: &TaskDocument,
    release_name: Option<&str>,
    version: Option<u32>,
) -> Result<()> {
    let mut config = document.content.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if let Some(version) = version {
        config.version = version;
    }

    let listeners: Vec<Box<dyn ReleaseListener<ReleaseContentResponse>>> =
        vec![Box::new(LogListener)];
    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::content::run(&config, &factory, &listeners).await?;

    println!("{} content finished", style("✓").green().bold());
    Ok(())
}
