use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::BridgeError;
use crate::widget::view::Artwork;

/// Hard bound on waiting for a remote cover, matching the original widget.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(2);
/// Per-request connect/read timeout for the HTTP client.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait]
pub trait ArtworkFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BridgeError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .expect("failed to create http client");

        Self { client }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new(HTTP_TIMEOUT)
    }
}

#[async_trait]
impl ArtworkFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, BridgeError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BridgeError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BridgeError::Fetch(format!(
                "http status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BridgeError::Fetch(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Resolves an album path into renderable artwork. Never fails: every
/// problem degrades to the fallback app icon with diagnostic logging only.
///
/// Remote decodes are cached in memory, keyed by URL, for the process
/// lifetime. Entries are small and never evicted.
pub struct ArtworkResolver {
    fetcher: Arc<dyn ArtworkFetcher>,
    cache: Arc<RwLock<HashMap<String, Artwork>>>,
    resolve_timeout: Duration,
}

impl ArtworkResolver {
    pub fn new(fetcher: Arc<dyn ArtworkFetcher>, resolve_timeout: Duration) -> Self {
        Self {
            fetcher,
            cache: Arc::new(RwLock::new(HashMap::new())),
            resolve_timeout,
        }
    }

    pub async fn resolve(&self, album_path: Option<&str>) -> Artwork {
        let Some(path) = album_path.filter(|p| !p.is_empty()) else {
            return Artwork::AppIcon;
        };

        if let Some(local) = path.strip_prefix("file://") {
            return decode_local(Path::new(local));
        }
        if path.starts_with('/') {
            return decode_local(Path::new(path));
        }

        self.fetch_remote(path).await
    }

    async fn fetch_remote(&self, url: &str) -> Artwork {
        if let Some(hit) = self.cache.read().unwrap().get(url).cloned() {
            debug!(url, "artwork_cache_hit");
            return hit;
        }

        let fetcher = self.fetcher.clone();
        let fetch_url = url.to_string();
        let fetch = tokio::spawn(async move { fetcher.fetch(&fetch_url).await });

        // A fetch that outlives the deadline is abandoned, not cancelled.
        let bytes = match tokio::time::timeout(self.resolve_timeout, fetch).await {
            Ok(Ok(Ok(bytes))) => bytes,
            Ok(Ok(Err(e))) => {
                debug!(url, error = %e, "artwork_fetch_failed");
                return Artwork::AppIcon;
            }
            Ok(Err(e)) => {
                debug!(url, error = %e, "artwork_fetch_join_failed");
                return Artwork::AppIcon;
            }
            Err(_) => {
                debug!(
                    url,
                    timeout_ms = self.resolve_timeout.as_millis() as u64,
                    "artwork_fetch_timed_out"
                );
                return Artwork::AppIcon;
            }
        };

        match image::load_from_memory(&bytes) {
            Ok(img) => {
                let artwork = Artwork::Bitmap(Arc::new(img.to_rgba8()));
                self.cache
                    .write()
                    .unwrap()
                    .insert(url.to_string(), artwork.clone());
                debug!(url, "artwork_cached");
                artwork
            }
            Err(e) => {
                debug!(url, error = %e, "artwork_remote_decode_failed");
                Artwork::AppIcon
            }
        }
    }
}

fn decode_local(path: &Path) -> Artwork {
    match image::open(path) {
        Ok(img) => Artwork::Bitmap(Arc::new(img.to_rgba8())),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "artwork_local_decode_failed");
            Artwork::AppIcon
        }
    }
}
