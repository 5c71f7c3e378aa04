use std::path::{Path, PathBuf};
use tracing::info;

use super::{already_exists, missing_input, produce, StageError, StageOutcome};
use crate::catalog::{AssetType, Episode};
use crate::external::AudioExtractor;

/// The audio track extracted from an episode's video.
pub struct Audio<'a> {
    episode: &'a Episode,
}

impl<'a> Audio<'a> {
    pub fn new(episode: &'a Episode) -> Self {
        Self { episode }
    }

    pub fn path(&self) -> PathBuf {
        self.episode.asset_file_path(AssetType::Audio)
    }

    pub fn exists(&self) -> bool {
        self.episode.asset_exists(AssetType::Audio)
    }

    /// Extracts audio from the downloaded video. Requires the video.
    pub async fn extract(&self, extractor: &dyn AudioExtractor) -> Result<StageOutcome, StageError> {
        if let Some(skipped) = already_exists(self.episode, AssetType::Audio)
            .or_else(|| missing_input(self.episode, AssetType::Video))
        {
            return Ok(skipped);
        }

        let video = self.episode.asset_file_path(AssetType::Video);
        let path = self.path();
        info!(file = %path.display(), "Extracting audio");

        produce(&path, async |staging: &Path| {
            extractor
                .extract(&video, staging)
                .await
                .map_err(StageError::Extract)
        })
        .await?;

        Ok(StageOutcome::Completed)
    }
}
