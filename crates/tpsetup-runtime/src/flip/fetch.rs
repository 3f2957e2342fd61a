//! Downloading prebuilt sync library archives.

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::path::Path;
use std::sync::Arc;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::{ProvisionError, ProvisionResult};
use crate::progress::{NoopProgress, ProgressReporter};

/// Retrieves an archive from `url` into `dest`, returning the bytes written.
///
/// Implementations must either leave a complete file at `dest` or fail.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, url: &str, dest: &Path) -> ProvisionResult<u64>;
}

/// Streams the archive over HTTP(S) with `reqwest`.
pub struct HttpArchiveFetcher {
    client: Client,
    progress: Arc<dyn ProgressReporter>,
}

impl HttpArchiveFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            progress: Arc::new(NoopProgress),
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    async fn stream_to_file(&self, url: &str, dest: &Path) -> ProvisionResult<u64> {
        let download_err = |reason: String| ProvisionError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url)
            .header(
                "User-Agent",
                concat!("tpsetup/", env!("CARGO_PKG_VERSION")),
            )
            .send()
            .await
            .map_err(|e| download_err(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(download_err(format!("HTTP {status}")));
        }

        let total = response.content_length();
        let name = dest
            .file_name()
            .map_or_else(|| url.to_string(), |n| n.to_string_lossy().into_owned());
        self.progress.start(&format!("Downloading {name}"), total);

        let mut file = File::create(dest).await.map_err(ProvisionError::io(format!(
            "Failed to create {}",
            dest.display()
        )))?;

        let mut downloaded: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_err(format!("error reading body: {e}")))?;
            file.write_all(&chunk)
                .await
                .map_err(ProvisionError::io("Error writing downloaded archive"))?;
            downloaded += chunk.len() as u64;
            self.progress.update(downloaded, total);
        }

        file.flush()
            .await
            .map_err(ProvisionError::io("Error flushing downloaded archive"))?;

        if let Some(expected) = total {
            if downloaded != expected {
                return Err(download_err(format!(
                    "connection closed after {downloaded} of {expected} bytes"
                )));
            }
        }

        Ok(downloaded)
    }
}

impl Default for HttpArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArchiveFetcher for HttpArchiveFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> ProvisionResult<u64> {
        debug!(url, dest = %dest.display(), "Starting archive download");

        match self.stream_to_file(url, dest).await {
            Ok(bytes) => {
                self.progress.finish("✓ Download complete");
                info!(url, bytes, "Downloaded archive");
                Ok(bytes)
            }
            Err(e) => {
                self.progress.finish_with_error("✗ Download failed");
                // Never leave a truncated file that could be mistaken for a good one
                match fs::remove_file(dest).await {
                    Ok(()) => debug!(path = %dest.display(), "Removed partial download"),
                    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                    Err(err) => warn!(
                        path = %dest.display(),
                        error = %err,
                        "Failed to remove partial download"
                    ),
                }
                Err(e)
            }
        }
    }
}
