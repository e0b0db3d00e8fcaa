//! Release-service endpoint discovery
//!
//! The service runs inside the cluster; its pod is found by label selector in
//! a configurable namespace and addressed on a configurable port.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ListParams};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{ClientError, Result};

/// Well-known namespace the release service is deployed in
pub const DEFAULT_NAMESPACE: &str = "kube-system";

/// Well-known port the release service listens on
pub const DEFAULT_PORT: u16 = 44134;

/// Where the release service lives inside the cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Namespace the service pod runs in
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Port the service listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Labels identifying the service pod
    #[serde(default = "default_labels")]
    pub labels: BTreeMap<String, String>,
}

impl Default for ServiceEndpoint {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            port: default_port(),
            labels: default_labels(),
        }
    }
}

impl ServiceEndpoint {
    /// The label selector matching the service pod
    pub fn label_selector(&self) -> String {
        self.labels
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Find a running service pod and produce its base URL
    pub async fn resolve(&self, client: &kube::Client) -> Result<Url> {
        let pods: Api<Pod> = Api::namespaced(client.clone(), &self.namespace);
        let params = ListParams::default().labels(&self.label_selector());
        let list = pods.list(&params).await?;

        let pod_ip = list
            .items
            .iter()
            .find_map(|pod| {
                let status = pod.status.as_ref()?;
                if status.phase.as_deref() == Some("Running") {
                    status.pod_ip.clone()
                } else {
                    None
                }
            })
            .ok_or_else(|| ClientError::ServiceUnavailable {
                message: format!(
                    "no running pod matched '{}' in namespace '{}'",
                    self.label_selector(),
                    self.namespace
                ),
            })?;

        let base = Url::parse(&format!("http://{}:{}/", pod_ip, self.port))?;
        tracing::debug!(%base, "resolved release-service endpoint");
        Ok(base)
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_labels() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("app".to_string(), "helm".to_string()),
        ("name".to_string(), "tiller".to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let endpoint = ServiceEndpoint::default();

        assert_eq!(endpoint.namespace, "kube-system");
        assert_eq!(endpoint.port, 44134);
        assert_eq!(endpoint.label_selector(), "app=helm,name=tiller");
    }

    #[test]
    fn test_deserialize_partial_overrides() {
        let endpoint: ServiceEndpoint =
            serde_json::from_str(r#"{"namespace": "releases"}"#).unwrap();

        assert_eq!(endpoint.namespace, "releases");
        assert_eq!(endpoint.port, DEFAULT_PORT);
        assert_eq!(endpoint.labels, super::default_labels());
    }
}
