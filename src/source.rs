//! Resource sources for the index and detail records.
//!
//! Both resources are static files produced by the data generator. They are
//! read either over HTTP from the published site or straight from the
//! generated directory on disk.

use crate::config::{LookupConfig, RetryPolicy};
use crate::error::{LookupError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Something that can serve the static resources by relative location
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch the raw body of the resource at `location` (relative path)
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;

    /// Human-readable description for logs
    fn describe(&self) -> String;
}

/// Static site served over HTTP
pub struct HttpSource {
    client: Client,
    base: Url,
}

impl HttpSource {
    pub fn new(base: &str, config: &LookupConfig) -> Result<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base.ends_with('/') {
            base.to_string()
        } else {
            format!("{}/", base)
        };
        let base = Url::parse(&normalized).map_err(|e| LookupError::InvalidSource {
            root: normalized.clone(),
            reason: e.to_string(),
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| LookupError::http(base.as_str(), e))?;

        Ok(Self { client, base })
    }

    fn url_for(&self, location: &str) -> Result<Url> {
        self.base
            .join(location)
            .map_err(|e| LookupError::InvalidSource {
                root: self.base.to_string(),
                reason: format!("cannot join '{}': {}", location, e),
            })
    }
}

#[async_trait]
impl ResourceSource for HttpSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let url = self.url_for(location)?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LookupError::http(url.as_str(), e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(LookupError::NotFound {
                location: url.to_string(),
            });
        }
        if !status.is_success() {
            return Err(LookupError::UnsuccessfulStatus {
                location: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| LookupError::http(url.as_str(), e))?;
        Ok(body.to_vec())
    }

    fn describe(&self) -> String {
        self.base.to_string()
    }
}

/// Generated resource tree on the local filesystem
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl ResourceSource for DirectorySource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let path = self.root.join(location);
        debug!("Reading {}", path.display());

        tokio::fs::read(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LookupError::NotFound {
                    location: path.display().to_string(),
                }
            } else {
                LookupError::io(path.display().to_string(), e)
            }
        })
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick the source implementation for the configured root
pub fn source_from_config(config: &LookupConfig) -> Result<Arc<dyn ResourceSource>> {
    let root = config.source_root.trim();
    if root.starts_with("http://") || root.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(root, config)?))
    } else {
        Ok(Arc::new(DirectorySource::new(root)))
    }
}

/// Fetch `location` and parse it as JSON, retrying transient failures
/// according to `retry`.
pub async fn fetch_json<T: DeserializeOwned>(
    source: &dyn ResourceSource,
    location: &str,
    retry: &RetryPolicy,
) -> Result<T> {
    let mut attempt = 1;
    let body = loop {
        match source.fetch(location).await {
            Ok(body) => break body,
            Err(e) if e.is_transient() && attempt < retry.max_attempts => {
                warn!(
                    "Attempt {}/{} for {} failed: {}",
                    attempt, retry.max_attempts, location, e
                );
                tokio::time::sleep(retry.delay_before(attempt)).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    };

    serde_json::from_slice(&body).map_err(|e| LookupError::json(location, e))
}
