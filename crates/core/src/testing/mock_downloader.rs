//! Mock video downloader.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external::{ToolError, VideoDownloader};

/// A recorded download for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedDownload {
    pub url: String,
    pub output: PathBuf,
}

/// Mock implementation of [`VideoDownloader`] that writes a placeholder file.
#[derive(Debug, Default)]
pub struct MockDownloader {
    downloads: Arc<RwLock<Vec<RecordedDownload>>>,
    /// If set, the next download fails with this error.
    next_error: Arc<RwLock<Option<ToolError>>>,
    /// Whether `check` reports the tool as missing.
    missing: Arc<RwLock<bool>>,
}

impl MockDownloader {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded_downloads(&self) -> Vec<RecordedDownload> {
        self.downloads.read().await.clone()
    }

    pub async fn download_count(&self) -> usize {
        self.downloads.read().await.len()
    }

    /// Configure the next download to fail with the given error.
    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make `check` fail as if the binary were not installed.
    pub async fn set_missing(&self, missing: bool) {
        *self.missing.write().await = missing;
    }
}

#[async_trait]
impl VideoDownloader for MockDownloader {
    async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        self.downloads.write().await.push(RecordedDownload {
            url: url.to_string(),
            output: output.to_path_buf(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        tokio::fs::write(output, b"mock video").await?;
        Ok(())
    }

    async fn check(&self) -> Result<(), ToolError> {
        if *self.missing.read().await {
            return Err(ToolError::NotFound {
                path: PathBuf::from("youtube-dl"),
            });
        }
        Ok(())
    }
}
