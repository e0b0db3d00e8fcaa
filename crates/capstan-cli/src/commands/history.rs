//! History command - log the revision history of a release

use capstan_client::{ReleaseHistoryResponse, RemoteConnectionFactory};
use capstan_tasks::{LogListener, ReleaseListener};
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(
    document: &TaskDocument,
    release_name: Option<&str>,
    max: Option<u32>,
) -> Result<()> {
    let mut config = document.history.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if let Some(max) = max {
        config.max = max;
    }

    let listeners: Vec<Box<dyn ReleaseListener<ReleaseHistoryResponse>>> =
        vec![Box::new(LogListener)];
    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::history::run(&config, &factory, &listeners).await?;

    println!("{} history finished", style("✓").green().bold());
    Ok(())
}
