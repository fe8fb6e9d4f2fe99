//! Poster and backdrop downloads into the store's image directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use dailyreel_core::ArtworkSink;
use tracing::{debug, warn};

use crate::SourceError;
use crate::http::{USER_AGENT, ensure_success};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
/// Prefix of the references recorded in the catalog.
const REF_PREFIX: &str = "images";

pub struct ImageDownloader {
    client: reqwest::Client,
    dir: PathBuf,
    timeout: Duration,
}

impl ImageDownloader {
    /// Downloader writing into `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            dir: dir.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let req = self
            .client
            .get(url)
            .timeout(self.timeout)
            .header(reqwest::header::USER_AGENT, USER_AGENT);
        let resp = ensure_success(req.send().await?).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    async fn write(&self, file_name: &str, bytes: &[u8]) -> Result<String, SourceError> {
        tokio::fs::write(self.dir.join(file_name), bytes).await?;
        Ok(storage_ref(file_name))
    }
}

fn storage_ref(file_name: &str) -> String {
    format!("{REF_PREFIX}/{file_name}")
}

#[async_trait]
impl ArtworkSink for ImageDownloader {
    async fn store(&self, url: &str, file_name: &str) -> Option<String> {
        let bytes = match self.fetch(url).await {
            Ok(bytes) if !bytes.is_empty() => bytes,
            Ok(_) => {
                warn!(url, "empty image body, skipping");
                return None;
            }
            Err(e) => {
                warn!(url, error = %e, "image download failed");
                return None;
            }
        };
        match self.write(file_name, &bytes).await {
            Ok(reference) => {
                debug!(file = file_name, bytes = bytes.len(), "saved artwork");
                Some(reference)
            }
            Err(e) => {
                warn!(file = file_name, error = %e, "could not write artwork");
                None
            }
        }
    }
}
