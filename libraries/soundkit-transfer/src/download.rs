//! Streaming HTTP downloads.

use crate::config::TransferConfig;
use crate::error::{Result, TransferError};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use soundkit_core::{FileTransfer, ProgressCallback};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Downloads remote files over HTTP(S).
///
/// The body is streamed into `<destination>.part` and renamed into place once
/// complete, so a failed or cancelled transfer never leaves a file at the
/// destination.
#[derive(Debug, Clone)]
pub struct HttpFileTransfer {
    http: Client,
}

impl HttpFileTransfer {
    /// Create a transfer client.
    pub fn new(config: &TransferConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.clone());
        if config.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_secs));
        }

        Ok(Self {
            http: builder.build()?,
        })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }

    /// Download `url` to `dest_path`.
    ///
    /// `on_progress` receives the completed fraction after every chunk when the
    /// server sends a content length, and `1.0` once the file is in place.
    ///
    /// # Returns
    /// The final local path.
    pub async fn fetch(
        &self,
        url: &str,
        dest_path: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<PathBuf> {
        let parsed = Url::parse(url).map_err(|e| TransferError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransferError::InvalidUrl(format!(
                "{url}: unsupported scheme {}",
                parsed.scheme()
            )));
        }

        let part_path = part_path(dest_path);
        let result = self
            .stream_to(parsed, &part_path, on_progress, cancel)
            .await;

        match result {
            Ok(size) => {
                tokio::fs::rename(&part_path, dest_path).await?;
                on_progress(1.0);
                info!(dest = %dest_path.display(), size, "File downloaded");
                Ok(dest_path.to_path_buf())
            }
            Err(e) => {
                if let Err(remove_err) = tokio::fs::remove_file(&part_path).await {
                    if remove_err.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %part_path.display(), error = %remove_err, "Failed to remove partial download");
                    }
                }
                debug!(url = %url, error = %e, "Download failed");
                Err(e)
            }
        }
    }

    async fn stream_to(
        &self,
        url: Url,
        part_path: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
        cancel: &CancellationToken,
    ) -> Result<u64> {
        debug!(url = %url, dest = %part_path.display(), "Starting download");

        let response = tokio::select! {
            biased;
            () = cancel.cancelled() => return Err(TransferError::Cancelled),
            response = self.http.get(url.clone()).send() => response?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let total_size = response.content_length().filter(|total| *total > 0);

        if let Some(parent) = part_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = File::create(part_path).await?;
        let mut downloaded: u64 = 0;

        let mut stream = response.bytes_stream();
        loop {
            let chunk = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(TransferError::Cancelled),
                chunk = stream.next() => chunk,
            };
            let Some(chunk) = chunk else {
                break;
            };

            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(total) = total_size {
                on_progress((downloaded as f32 / total as f32).min(1.0));
            }
        }

        file.flush().await?;
        Ok(downloaded)
    }
}

#[async_trait]
impl FileTransfer for HttpFileTransfer {
    async fn download(
        &self,
        url: &str,
        destination: &Path,
        on_progress: ProgressCallback,
        cancel: CancellationToken,
    ) -> soundkit_core::Result<PathBuf> {
        Ok(self
            .fetch(url, destination, &*on_progress, &cancel)
            .await?)
    }
}

fn part_path(dest_path: &Path) -> PathBuf {
    let mut name = dest_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest_path.with_file_name(name)
}
