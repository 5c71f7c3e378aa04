//! Video downloads via the `youtube-dl` command line tool.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::process::run_tool;
use super::{ToolError, VideoDownloader};
use crate::config::DownloaderConfig;

/// Downloader backed by `youtube-dl` (or a compatible fork such as `yt-dlp`).
pub struct YoutubeDl {
    binary: PathBuf,
    extra_args: Vec<String>,
}

impl YoutubeDl {
    pub fn new(config: &DownloaderConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn build_args(&self, url: &str, output: &Path) -> Vec<String> {
        let mut args = vec!["-o".to_string(), output.to_string_lossy().to_string()];
        args.extend(self.extra_args.iter().cloned());
        args.push(url.to_string());
        args
    }
}

#[async_trait]
impl VideoDownloader for YoutubeDl {
    async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError> {
        run_tool(&self.binary, &self.build_args(url, output)).await
    }

    async fn check(&self) -> Result<(), ToolError> {
        run_tool(&self.binary, &["--version".to_string()]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let config = DownloaderConfig {
            extra_args: vec!["-f".to_string(), "mp4".to_string()],
            ..Default::default()
        };
        let downloader = YoutubeDl::new(&config);
        let args = downloader.build_args(
            "https://www.youtube.com/watch?v=abc",
            Path::new("/tmp/videos/season-1/01-01-x.partial.mp4"),
        );
        assert_eq!(
            args,
            vec![
                "-o",
                "/tmp/videos/season-1/01-01-x.partial.mp4",
                "-f",
                "mp4",
                "https://www.youtube.com/watch?v=abc",
            ]
        );
    }

    #[tokio::test]
    async fn test_check_missing_binary() {
        let config = DownloaderConfig {
            binary: PathBuf::from("/nonexistent/youtube-dl"),
            ..Default::default()
        };
        let result = YoutubeDl::new(&config).check().await;
        assert!(matches!(result, Err(ToolError::NotFound { .. })));
    }
}
