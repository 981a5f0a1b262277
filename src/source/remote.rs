use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, info};
use reqwest::{Client, StatusCode};

use super::{ManifestLocation, ManifestSource, SourceError};

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

struct CachedManifest {
    fetched_at: Instant,
    contents: String,
}

/// Manifests fetched over HTTPS from a raw-content host, e.g.
/// `https://raw.githubusercontent.com/<org>/<repo>/<branch>`.
///
/// Responses are reused for `cache_ttl` before being fetched again.
pub struct RemoteManifestSource {
    base_url: String,
    client: Client,
    cache_ttl: Duration,
    cache: DashMap<ManifestLocation, CachedManifest>,
}

impl RemoteManifestSource {
    pub fn new(
        base_url: impl Into<String>,
        cache_ttl: Duration,
        fetch_timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(fetch_timeout).build()?;
        Ok(RemoteManifestSource {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            cache_ttl,
            cache: DashMap::new(),
        })
    }

    pub fn url(&self, location: &ManifestLocation) -> String {
        format!("{}/{}", self.base_url, location.relative_path())
    }

    fn cached(&self, location: &ManifestLocation) -> Option<String> {
        self.cache
            .get(location)
            .filter(|entry| entry.fetched_at.elapsed() < self.cache_ttl)
            .map(|entry| entry.contents.clone())
    }

    async fn fetch(&self, location: &ManifestLocation) -> Result<String, SourceError> {
        let url = self.url(location);
        let http_error = |source: reqwest::Error| {
            if source.is_timeout() {
                SourceError::Timeout { url: url.clone() }
            } else {
                SourceError::Http {
                    url: url.clone(),
                    source,
                }
            }
        };

        info!("Fetching {}", url);
        let response = self.client.get(&url).send().await.map_err(http_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound {
                location: location.clone(),
            });
        }
        response
            .error_for_status()
            .map_err(http_error)?
            .text()
            .await
            .map_err(http_error)
    }
}

#[async_trait]
impl ManifestSource for RemoteManifestSource {
    async fn read(&self, location: &ManifestLocation) -> Result<String, SourceError> {
        if let Some(contents) = self.cached(location) {
            debug!("Using cached copy of {}", location);
            return Ok(contents);
        }

        let contents = self.fetch(location).await?;
        self.cache.insert(
            location.clone(),
            CachedManifest {
                fetched_at: Instant::now(),
                contents: contents.clone(),
            },
        );
        Ok(contents)
    }
}
