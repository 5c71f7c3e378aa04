//! Mock audio extractor.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external::{AudioExtractor, ToolError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedExtraction {
    pub video: PathBuf,
    pub output: PathBuf,
}

/// Mock implementation of [`AudioExtractor`] that writes a placeholder file.
#[derive(Debug, Default)]
pub struct MockExtractor {
    extractions: Arc<RwLock<Vec<RecordedExtraction>>>,
    next_error: Arc<RwLock<Option<ToolError>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded_extractions(&self) -> Vec<RecordedExtraction> {
        self.extractions.read().await.clone()
    }

    pub async fn extraction_count(&self) -> usize {
        self.extractions.read().await.len()
    }

    pub async fn set_next_error(&self, error: ToolError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl AudioExtractor for MockExtractor {
    async fn extract(&self, video: &Path, output: &Path) -> Result<(), ToolError> {
        self.extractions.write().await.push(RecordedExtraction {
            video: video.to_path_buf(),
            output: output.to_path_buf(),
        });

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        tokio::fs::write(output, b"mock audio").await?;
        Ok(())
    }

    async fn check(&self) -> Result<(), ToolError> {
        Ok(())
    }
}
