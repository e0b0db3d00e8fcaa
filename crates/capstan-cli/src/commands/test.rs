//! Test command - run release tests and fail on a negative outcome

use capstan_client::{RemoteConnectionFactory, TestReleaseResponse};
use capstan_tasks::{LogListener, ReleaseListener};
use console::style;

use crate::config::TaskDocument;
use crate::error::Result;

pub async fn run(document: &TaskDocument, release_name: Option<&str>, cleanup: bool) -> Result<()> {
    let mut config = document.test.clone().unwrap_or_default();
    if let Some(name) = release_name {
        config.release_name = name.to_string();
    }
    if cleanup {
        config.cleanup = true;
    }

    let listeners: Vec<Box<dyn ReleaseListener<TestReleaseResponse>>> =
        vec![Box::new(LogListener)];
    let factory = RemoteConnectionFactory::new(document.service_endpoint());
    capstan_tasks::test::run(&config, &factory, &listeners).await?;

    println!("{} test finished", style("✓").green().bold());
    Ok(())
}
