//! JSON/HTTP transport for the release service
//!
//! Unary operations POST a request document and decode a single response
//! document. `list` and `test` answer with newline-delimited JSON, decoded
//! incrementally so consumers can stop early.

use async_trait::async_trait;
use base64::Engine;
use capstan_core::Chart;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::endpoint::ServiceEndpoint;
use crate::error::{ClientError, Result};
use crate::request::{
    InstallReleaseRequest, ListReleasesRequest, ReleaseContentRequest, ReleaseHistoryRequest,
    ReleaseStatusRequest, RollbackReleaseRequest, TestReleaseRequest, UninstallReleaseRequest,
    UpdateReleaseRequest,
};
use crate::response::{
    InstallReleaseResponse, ListReleasesResponse, ReleaseContentResponse, ReleaseHistoryResponse,
    ReleaseStatusResponse, RollbackReleaseResponse, TestReleaseResponse, UninstallReleaseResponse,
    UpdateReleaseResponse,
};
use crate::service::{ConnectionFactory, ReleaseService, ResponseStream};

/// Release-service handle speaking JSON over HTTP
pub struct RemoteReleaseService {
    http: reqwest::Client,
    base: Url,
}

/// Wire document for operations that ship a chart alongside the request
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChartEnvelope<R: Serialize> {
    request: R,

    /// The chart as a base64-encoded gzip tar archive
    chart_archive: String,
}

impl RemoteReleaseService {
    /// Create a handle bound to a resolved base URL
    pub fn new(base: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base,
        }
    }

    /// The base URL this handle talks to
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn operation_url(&self, operation: &'static str) -> Result<Url> {
        Ok(self.base.join(&format!("v1/{operation}"))?)
    }

    async fn call<Req, Resp>(&self, operation: &'static str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.operation_url(operation)?;
        let response = self.http.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                operation,
                message: format!("{status}: {message}"),
            });
        }

        response.json().await.map_err(|e| ClientError::Decode {
            operation,
            message: e.to_string(),
        })
    }

    fn call_streaming<Resp>(
        &self,
        operation: &'static str,
        body: serde_json::Value,
    ) -> ResponseStream<'static, Resp>
    where
        Resp: DeserializeOwned + Send + 'static,
    {
        match self.operation_url(operation) {
            Ok(url) => ndjson_stream(self.http.clone(), url, body, operation),
            Err(e) => stream::once(async move { Err(e) }).boxed(),
        }
    }

    fn encode_chart(chart: &Chart) -> Result<String> {
        let mut archive = Vec::new();
        capstan_core::write_chart(chart, &mut archive)?;
        Ok(base64::engine::general_purpose::STANDARD.encode(archive))
    }
}

#[async_trait]
impl ReleaseService for RemoteReleaseService {
    async fn install(
        &self,
        chart: Chart,
        request: InstallReleaseRequest,
    ) -> Result<InstallReleaseResponse> {
        let envelope = ChartEnvelope {
            request,
            chart_archive: Self::encode_chart(&chart)?,
        };
        self.call("releases/install", &envelope).await
    }

    async fn update(
        &self,
        chart: Chart,
        request: UpdateReleaseRequest,
    ) -> Result<UpdateReleaseResponse> {
        let envelope = ChartEnvelope {
            request,
            chart_archive: Self::encode_chart(&chart)?,
        };
        self.call("releases/update", &envelope).await
    }

    async fn rollback(&self, request: RollbackReleaseRequest) -> Result<RollbackReleaseResponse> {
        self.call("releases/rollback", &request).await
    }

    async fn uninstall(
        &self,
        request: UninstallReleaseRequest,
    ) -> Result<UninstallReleaseResponse> {
        self.call("releases/uninstall", &request).await
    }

    async fn status(&self, request: ReleaseStatusRequest) -> Result<ReleaseStatusResponse> {
        self.call("releases/status", &request).await
    }

    async fn content(&self, request: ReleaseContentRequest) -> Result<ReleaseContentResponse> {
        self.call("releases/content", &request).await
    }

    async fn history(&self, request: ReleaseHistoryRequest) -> Result<ReleaseHistoryResponse> {
        self.call("releases/history", &request).await
    }

    fn list(&self, request: ListReleasesRequest) -> ResponseStream<'_, ListReleasesResponse> {
        match serde_json::to_value(&request) {
            Ok(body) => self.call_streaming("releases/list", body),
            Err(e) => stream::once(async move {
                Err(ClientError::Decode {
                    operation: "releases/list",
                    message: e.to_string(),
                })
            })
            .boxed(),
        }
    }

    fn test(&self, request: TestReleaseRequest) -> ResponseStream<'_, TestReleaseResponse> {
        match serde_json::to_value(&request) {
            Ok(body) => self.call_streaming("releases/test", body),
            Err(e) => stream::once(async move {
                Err(ClientError::Decode {
                    operation: "releases/test",
                    message: e.to_string(),
                })
            })
            .boxed(),
        }
    }

    async fn close(&self) -> Result<()> {
        // The HTTP client holds no server-side state; dropping it is enough.
        Ok(())
    }
}

/// Decode a newline-delimited JSON response body into a lazy stream
fn ndjson_stream<Resp>(
    http: reqwest::Client,
    url: Url,
    body: serde_json::Value,
    operation: &'static str,
) -> BoxStream<'static, Result<Resp>>
where
    Resp: DeserializeOwned + Send + 'static,
{
    enum State {
        Pending {
            http: reqwest::Client,
            url: Url,
            body: serde_json::Value,
        },
        Open {
            chunks: BoxStream<'static, reqwest::Result<Vec<u8>>>,
            buffer: Vec<u8>,
            exhausted: bool,
        },
        Finished,
    }

    fn decode<Resp: DeserializeOwned>(line: &[u8], operation: &'static str) -> Result<Resp> {
        serde_json::from_slice(line).map_err(|e| ClientError::Decode {
            operation,
            message: e.to_string(),
        })
    }

    stream::try_unfold(
        State::Pending { http, url, body },
        move |mut state| async move {
            loop {
                match state {
                    State::Pending { http, url, body } => {
                        let response = http.post(url).json(&body).send().await?;
                        let status = response.status();
                        if !status.is_success() {
                            let message = response.text().await.unwrap_or_default();
                            return Err(ClientError::Status {
                                operation,
                                message: format!("{status}: {message}"),
                            });
                        }
                        state = State::Open {
                            chunks: response.bytes_stream().map_ok(|b| b.to_vec()).boxed(),
                            buffer: Vec::new(),
                            exhausted: false,
                        };
                    }
                    State::Open {
                        mut chunks,
                        mut buffer,
                        exhausted,
                    } => {
                        if let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                            let mut line: Vec<u8> = buffer.drain(..=pos).collect();
                            line.pop();
                            let next = State::Open {
                                chunks,
                                buffer,
                                exhausted,
                            };
                            if line.iter().all(u8::is_ascii_whitespace) {
                                state = next;
                                continue;
                            }
                            return Ok(Some((decode(&line, operation)?, next)));
                        }

                        if exhausted {
                            if buffer.iter().all(u8::is_ascii_whitespace) {
                                return Ok(None);
                            }
                            // Trailing element without a final newline
                            return Ok(Some((decode(&buffer, operation)?, State::Finished)));
                        }

                        match chunks.try_next().await? {
                            Some(chunk) => {
                                buffer.extend_from_slice(&chunk);
                                state = State::Open {
                                    chunks,
                                    buffer,
                                    exhausted: false,
                                };
                            }
                            None => {
                                state = State::Open {
                                    chunks,
                                    buffer,
                                    exhausted: true,
                                };
                            }
                        }
                    }
                    State::Finished => return Ok(None),
                }
            }
        },
    )
    .boxed()
}

/// Default factory: cluster client from the environment (or an explicit
/// configuration), endpoint resolved by label selector
pub struct RemoteConnectionFactory {
    endpoint: ServiceEndpoint,
    config: Option<kube::Config>,
    namespace: Option<String>,
}

impl RemoteConnectionFactory {
    /// Create a factory resolving the given endpoint with environment-default
    /// cluster configuration
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Self {
            endpoint,
            config: None,
            namespace: None,
        }
    }

    /// Use an explicit cluster configuration instead of the environment
    pub fn with_config(mut self, config: kube::Config) -> Self {
        self.namespace = Some(config.default_namespace.clone());
        self.config = Some(config);
        self
    }

    /// The endpoint this factory resolves
    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ConnectionFactory for RemoteConnectionFactory {
    type Service = RemoteReleaseService;

    async fn connect(&self) -> Result<RemoteReleaseService> {
        let client = match &self.config {
            Some(config) => kube::Client::try_from(config.clone())?,
            None => kube::Client::try_default().await?,
        };
        let base = self.endpoint.resolve(&client).await?;
        Ok(RemoteReleaseService::new(base))
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}
