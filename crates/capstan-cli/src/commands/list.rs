//! List command - log the releases visible in a namespace

use capstan_client::{ListReleasesResponse, RemoteConnectionFactory};
use capstan_tasks::{LogListener, ReleaseListener};
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(document: &TaskDocument, namespace: Option<&str>) -> Result<()> {
    let mut config = document.list.clone().unwrap_or_default();
    if let Some(namespace) = namespace {
        config.namespace = Some(namespace.to_string());
    }

    let listeners: Vec<Box<dyn ReleaseListener<ListReleasesResponse>>> =
        vec![Box::new(LogListener)];
    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::list::run(&config, &factory, &listeners).await?;

    println!("{} list finished", style("✓").green().bold());
    Ok(())
}
