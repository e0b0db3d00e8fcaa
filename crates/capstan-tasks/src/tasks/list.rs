//! List task - enumerate releases and report each page to listeners

use capstan_client::{
    ConnectionFactory, ListReleasesRequest, ListReleasesResponse, ReleaseService, ReleaseStatus,
    SortBy, SortOrder,
};
use capstan_core::validate_namespace;
use futures::TryStreamExt;
use serde::Deserialize;

use super::{default_limit, finish};
use crate::error::{Result, TaskError};
use crate::event::{Operation, ReleaseEvent, ReleaseListener, dispatch};

/// Configuration for the list task
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListConfig {
    #[serde(default)]
    pub skip: bool,

    /// Regular expression filtering release names
    #[serde(default)]
    pub filter: Option<String>,

    /// Maximum number of releases per page
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Continuation token from a previous page
    #[serde(default)]
    pub offset: Option<String>,

    /// Namespace to list in; falls back to the cluster client's namespace,
    /// then to `default`
    #[serde(default)]
    pub namespace: Option<String>,

    #[serde(default)]
    pub sort_by: SortBy,

    #[serde(default)]
    pub sort_order: SortOrder,

    /// Restrict the listing to releases in these states
    #[serde(default)]
    pub status_codes: Vec<ReleaseStatus>,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            skip: false,
            filter: None,
            limit: default_limit(),
            offset: None,
            namespace: None,
            sort_by: SortBy::default(),
            sort_order: SortOrder::default(),
            status_codes: Vec::new(),
        }
    }
}

/// Build the request from configuration plus the resolved namespace
///
/// Pure; identical inputs yield structurally identical requests.
pub(crate) fn build_request(config: &ListConfig, namespace: String) -> ListReleasesRequest {
    ListReleasesRequest {
        filter: config.filter.clone(),
        limit: config.limit,
        offset: config.offset.clone(),
        namespace,
        sort_by: config.sort_by,
        sort_order: config.sort_order,
        status_codes: config.status_codes.clone(),
    }
}

/// Run the list task
pub async fn run<F>(
    config: &ListConfig,
    factory: &F,
    listeners: &[Box<dyn ReleaseListener<ListReleasesResponse>>],
) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping list by request");
        return Ok(());
    }

    if listeners.is_empty() {
        tracing::info!("skipping list: no listeners registered");
        return Ok(());
    }

    let namespace = config
        .namespace
        .clone()
        .filter(|ns| !ns.is_empty())
        .or_else(|| factory.namespace().map(str::to_string))
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| "default".to_string());
    validate_namespace(&namespace).map_err(TaskError::Config)?;

    let request = build_request(config, namespace);

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = list_releases(&service, request, listeners).await;
    finish(service, result).await
}

async fn list_releases<S: ReleaseService>(
    service: &S,
    request: ListReleasesRequest,
    listeners: &[Box<dyn ReleaseListener<ListReleasesResponse>>],
) -> Result<()> {
    tracing::info!(namespace = %request.namespace, "listing releases");

    let mut pages = service.list(request);
    while let Some(page) = pages.try_next().await.map_err(|source| TaskError::Remote {
        operation: Operation::List,
        source,
    })? {
        dispatch(listeners, &ReleaseEvent::new(Operation::List, page))?;
    }

    Ok(())
}
