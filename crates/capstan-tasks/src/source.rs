//! Chart and values sources addressed by URL
//!
//! `file:` sources read the local filesystem (a chart directory or a packaged
//! archive); `http(s):` sources fetch a packaged archive or a values document.

use std::path::PathBuf;

use capstan_core::Chart;
use url::Url;

use crate::error::{Result, TaskError};

/// Load a chart from a URL
///
/// A `file:` URL may point at a chart directory or a packaged `.tgz`;
/// `http(s):` URLs are fetched and decoded as packaged archives.
pub(crate) async fn load_chart(url: &Url) -> Result<Chart> {
    match url.scheme() {
        "file" => {
            let path = to_file_path(url)?;
            if path.is_dir() {
                Chart::load_dir(&path).map_err(TaskError::Chart)
            } else if path.is_file() {
                let data = std::fs::read(&path)?;
                capstan_core::read_chart_bytes(&data).map_err(TaskError::Chart)
            } else {
                Err(TaskError::ChartNotFound {
                    location: url.to_string(),
                })
            }
        }
        "http" | "https" => {
            let data = fetch_bytes(url).await?;
            capstan_core::read_chart_bytes(&data).map_err(TaskError::Chart)
        }
        scheme => Err(TaskError::UnsupportedScheme {
            scheme: scheme.to_string(),
            url: url.clone(),
        }),
    }
}

/// Resolve the effective values document
///
/// Inline YAML wins when non-empty; otherwise the values URL is fetched.
pub(crate) async fn resolve_values(
    inline: Option<&str>,
    url: Option<&Url>,
) -> Result<Option<String>> {
    if let Some(yaml) = inline {
        if !yaml.is_empty() {
            return Ok(Some(yaml.to_string()));
        }
    }
    match url {
        Some(url) => Ok(Some(fetch_text(url).await?)),
        None => Ok(None),
    }
}

pub(crate) fn to_file_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path().map_err(|_| TaskError::InvalidConfig {
        message: format!("not a local path: {url}"),
    })
}

async fn fetch_bytes(url: &Url) -> Result<Vec<u8>> {
    let response = reqwest::get(url.clone())
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| fetch_error(url, e))?;
    let bytes = response.bytes().await.map_err(|e| fetch_error(url, e))?;
    Ok(bytes.to_vec())
}

async fn fetch_text(url: &Url) -> Result<String> {
    match url.scheme() {
        "file" => {
            let path = to_file_path(url)?;
            std::fs::read_to_string(&path).map_err(|e| TaskError::Fetch {
                url: url.clone(),
                message: e.to_string(),
            })
        }
        "http" | "https" => {
            let response = reqwest::get(url.clone())
                .await
                .and_then(|r| r.error_for_status())
                .map_err(|e| fetch_error(url, e))?;
            response.text().await.map_err(|e| fetch_error(url, e))
        }
        scheme => Err(TaskError::UnsupportedScheme {
            scheme: scheme.to_string(),
            url: url.clone(),
        }),
    }
}

fn fetch_error(url: &Url, error: reqwest::Error) -> TaskError {
    TaskError::Fetch {
        url: url.clone(),
        message: error.to_string(),
    }
}
