use std::path::{Path, PathBuf};
use tracing::info;

use super::{already_exists, produce, SkipReason, StageError, StageOutcome};
use crate::catalog::{AssetType, Episode};
use crate::external::VideoDownloader;

/// The downloaded source video of an episode.
pub struct Video<'a> {
    episode: &'a Episode,
}

impl<'a> Video<'a> {
    pub fn new(episode: &'a Episode) -> Self {
        Self { episode }
    }

    pub fn path(&self) -> PathBuf {
        self.episode.asset_file_path(AssetType::Video)
    }

    pub fn exists(&self) -> bool {
        self.episode.asset_exists(AssetType::Video)
    }

    /// Downloads the video from the episode's source URL.
    pub async fn download(
        &self,
        downloader: &dyn VideoDownloader,
    ) -> Result<StageOutcome, StageError> {
        if let Some(skipped) = already_exists(self.episode, AssetType::Video) {
            return Ok(skipped);
        }
        let Some(url) = self.episode.url() else {
            return Ok(StageOutcome::Skipped(SkipReason::NoSourceUrl));
        };

        let path = self.path();
        info!(file = %path.display(), url, "Downloading video");

        produce(&path, async |staging: &Path| {
            downloader
                .download(url, staging)
                .await
                .map_err(StageError::Download)
        })
        .await?;

        Ok(StageOutcome::Completed)
    }
}
