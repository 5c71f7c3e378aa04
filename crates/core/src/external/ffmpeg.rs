//! Audio extraction via `ffmpeg`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::process::run_tool;
use super::{AudioExtractor, ToolError};
use crate::config::ExtractorConfig;

/// Extractor that drops the video stream and re-encodes audio by output extension.
pub struct FfmpegExtractor {
    ffmpeg_path: PathBuf,
    log_level: String,
}

impl FfmpegExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            ffmpeg_path: config.ffmpeg_path.clone(),
            log_level: config.log_level.clone(),
        }
    }

    fn build_args(&self, video: &Path, output: &Path) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            video.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-loglevel".to_string(),
            self.log_level.clone(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl AudioExtractor for FfmpegExtractor {
    async fn extract(&self, video: &Path, output: &Path) -> Result<(), ToolError> {
        run_tool(&self.ffmpeg_path, &self.build_args(video, output)).await
    }

    async fn check(&self) -> Result<(), ToolError> {
        run_tool(&self.ffmpeg_path, &["-version".to_string()]).await
    }
}
