//! Content task - report the stored manifest of a release revision to listeners

use capstan_client::{
    ConnectionFactory, ReleaseContentRequest, ReleaseContentResponse, ReleaseService,
};
use capstan_core::validate_release_name;
use serde::Deserialize;

use super::finish;
use crate::error::{Result, TaskError};
use crate::event::{Operation, ReleaseEvent, ReleaseListener, dispatch};

/// Configuration for the content task
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release to fetch
    pub release_name: String,

    /// Revision to fetch; 0 means the latest
    #[serde(default)]
    pub version: u32,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            skip: false,
            release_name: String::new(),
            version: 0,
        }
    }
}

/// Run the content task
pub async fn run<F>(
    config: &ContentConfig,
    factory: &F,
    listeners: &[Box<dyn ReleaseListener<ReleaseContentResponse>>],
) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping content by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    if listeners.is_empty() {
        tracing::info!("skipping content: no listeners registered");
        return Ok(());
    }

    let request = ReleaseContentRequest {
        name: config.release_name.clone(),
        version: config.version,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = retrieve_content(&service, request, listeners).await;
    finish(service, result).await
}

async fn retrieve_content<S: ReleaseService>(
    service: &S,
    request: ReleaseContentRequest,
    listeners: &[Box<dyn ReleaseListener<ReleaseContentResponse>>],
) -> Result<()> {
    tracing::info!(name = %request.name, version = request.version, "retrieving release content");
    let response = service
        .content(request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::Content,
            source,
        })?;

    dispatch(listeners, &ReleaseEvent::new(Operation::Content, response))
}
