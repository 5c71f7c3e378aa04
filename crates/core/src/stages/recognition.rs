use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;

use super::{already_exists, missing_input, SkipReason, StageError, StageOutcome};
use crate::catalog::{AssetStatus, AssetType, Episode};
use crate::external::{
    CreateJobRequest, RecognitionJob, SpeechRecognitionResults, SpeechToText,
    EVENT_COMPLETED_WITH_RESULTS,
};
use crate::fsutil;

const AUDIO_CONTENT_TYPE: &str = "audio/mp3";

/// Speech recognition output for an episode, stored as the vendor's JSON
/// result blocks.
pub struct Recognition<'a> {
    episode: &'a Episode,
}

impl<'a> Recognition<'a> {
    pub fn new(episode: &'a Episode) -> Self {
        Self { episode }
    }

    pub fn path(&self) -> PathBuf {
        self.episode.asset_file_path(AssetType::Recognition)
    }

    pub fn exists(&self) -> bool {
        self.episode.asset_exists(AssetType::Recognition)
    }

    /// Submits the episode's audio as an asynchronous recognition job.
    ///
    /// The episode name is sent as the user token so the result can be
    /// routed back to the episode when it arrives.
    pub async fn start_job(
        &self,
        speech: &dyn SpeechToText,
        callback_url: Option<&str>,
    ) -> Result<StageOutcome, StageError> {
        if let Some(skipped) = already_exists(self.episode, AssetType::Recognition) {
            return Ok(skipped);
        }
        if self.episode.asset_status(AssetType::Recognition) == AssetStatus::InProcess {
            return Ok(StageOutcome::Skipped(SkipReason::InProcess));
        }
        if let Some(skipped) = missing_input(self.episode, AssetType::Audio) {
            return Ok(skipped);
        }

        let audio = tokio::fs::read(self.episode.asset_file_path(AssetType::Audio)).await?;
        let request = CreateJobRequest {
            audio,
            content_type: AUDIO_CONTENT_TYPE.to_string(),
            callback_url: callback_url.map(str::to_string),
            user_token: self.episode.name(),
            events: EVENT_COMPLETED_WITH_RESULTS.to_string(),
            profanity_filter: false,
        };

        let job = speech
            .create_job(request)
            .await
            .map_err(StageError::Speech)?;
        info!(job_id = %job.id, status = ?job.status, "Recognition job created");

        Ok(StageOutcome::Completed)
    }

    /// Stores the results of a finished job.
    pub async fn write_results(
        &self,
        results: &[SpeechRecognitionResults],
    ) -> Result<PathBuf, StageError> {
        let path = self.path();
        fsutil::write_json_atomic(&path, results).await?;
        info!(file = %path.display(), "Recognition written");
        Ok(path)
    }

    pub async fn read_results(&self) -> Result<Vec<SpeechRecognitionResults>, StageError> {
        let path = self.path();
        let contents = tokio::fs::read(&path).await?;
        serde_json::from_slice(&contents).map_err(|source| StageError::Json {
            file: path.display().to_string(),
            source,
        })
    }
}

/// Status lookup for jobs still running at the vendor, keyed by episode name.
pub fn in_flight_statuses(jobs: &[RecognitionJob]) -> HashMap<String, AssetStatus> {
    jobs.iter()
        .filter_map(|job| {
            let token = job.user_token.as_ref()?;
            let status = job.status.asset_status()?;
            Some((token.clone(), status))
        })
        .collect()
}
