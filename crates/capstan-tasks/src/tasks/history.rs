//! History task - report the revision history of a release to listeners

use capstan_client::{
    ConnectionFactory, ReleaseHistoryRequest, ReleaseHistoryResponse, ReleaseService,
};
use capstan_core::validate_release_name;
use serde::Deserialize;

use super::finish;
use crate::error::{Result, TaskError};
use crate::event::{Operation, ReleaseEvent, ReleaseListener, dispatch};

/// Configuration for the history task
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryConfig {
    #[serde(default)]
    pub skip: bool,

    /// Release whose history is retrieved
    pub release_name: String,

    /// Maximum number of revisions to retrieve; 0 means unbounded
    #[serde(default)]
    pub max: u32,
}

/// Run the history task
pub async fn run<F>(
    config: &HistoryConfig,
    factory: &F,
    listeners: &[Box<dyn ReleaseListener<ReleaseHistoryResponse>>],
) -> Result<()>
where
    F: ConnectionFactory,
{
    if config.skip {
        tracing::debug!("skipping history by request");
        return Ok(());
    }

    validate_release_name(&config.release_name).map_err(TaskError::Config)?;

    if listeners.is_empty() {
        tracing::info!("skipping history: no listeners registered");
        return Ok(());
    }

    let request = ReleaseHistoryRequest {
        name: config.release_name.clone(),
        max: config.max,
    };

    let service = factory
        .connect()
        .await
        .map_err(|source| TaskError::Connect { source })?;
    let result = retrieve_history(&service, request, listeners).await;
    finish(service, result).await
}

async fn retrieve_history<S: ReleaseService>(
    service: &S,
    request: ReleaseHistoryRequest,
    listeners: &[Box<dyn ReleaseListener<ReleaseHistoryResponse>>],
) -> Result<()> {
    tracing::info!(name = %request.name, "retrieving release history");
    let response = service
        .history(request)
        .await
        .map_err(|source| TaskError::Remote {
            operation: Operation::History,
            source,
        })?;

    dispatch(listeners, &ReleaseEvent::new(Operation::History, response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::LogListener;
    use capstan_client::{MockConnectionFactory, MockReleaseService, ReleaseInfo};

    #[tokio::test]
    async fn test_empty_listeners_short_circuits() {
        let factory = MockConnectionFactory::default();
        let config = HistoryConfig {
            release_name: "myapp".to_string(),
            ..Default::default()
        };

        run(&config, &factory, &[]).await.unwrap();

        assert_eq!(factory.connection_count(), 0);
    }

    #[tokio::test]
    async fn test_max_zero_means_unbounded() {
        let listeners: Vec<Box<dyn ReleaseListener<ReleaseHistoryResponse>>> =
            vec![Box::new(LogListener)];
        let service = MockReleaseService::new().with_history(ReleaseHistoryResponse {
            releases: vec![
                ReleaseInfo {
                    name: "myapp".to_string(),
                    revision: 2,
                    ..Default::default()
                },
                ReleaseInfo {
                    name: "myapp".to_string(),
                    revision: 1,
                    ..Default::default()
                },
            ],
        });
        let factory = MockConnectionFactory::new(service);
        let config = HistoryConfig {
            release_name: "myapp".to_string(),
            max: 0,
            ..Default::default()
        };

        run(&config, &factory, &listeners).await.unwrap();

        let requests = factory.service().history_requests();
        assert_eq!(requests[0].max, 0);
    }

    #[test]
    fn test_config_binding() {
        let config: HistoryConfig =
            serde_yaml::from_str("releaseName: myapp\nmax: 10\n").unwrap();
        assert_eq!(config.release_name, "myapp");
        assert_eq!(config.max, 10);
    }
}
