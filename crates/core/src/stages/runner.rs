//! Batch execution of stages over a catalog selection.

use std::collections::HashMap;
use std::convert::Infallible;
use std::ops::AsyncFnMut;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::{
    in_flight_statuses, Analysis, Audio, Recognition, SkipReason, StageError, StageOutcome,
    Transcript, Video,
};
use crate::catalog::{AssetType, Catalog, Episode};
use crate::config::Config;
use crate::dispatch::{Selector, SolveError};
use crate::external::{
    AudioExtractor, EntityAnalyzer, JobStatus, SpeechToText, ToolError, VendorError,
    VideoDownloader,
};

/// Errors that stop a whole stage run. Per-episode failures do not; they
/// are counted in the [`RunSummary`].
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Dispatch(#[from] SolveError),

    #[error("{tool} is not available: {source}")]
    ToolUnavailable {
        tool: &'static str,
        #[source]
        source: ToolError,
    },

    #[error("Failed to list recognition jobs: {0}")]
    Jobs(#[source] VendorError),
}

/// Tally of one stage run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub visited: usize,
    pub completed: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    /// Counts `result`; returns true when it produced something.
    pub fn record(&mut self, result: &Result<StageOutcome, StageError>) -> bool {
        self.visited += 1;
        match result {
            Ok(StageOutcome::Completed) => {
                self.completed += 1;
                true
            }
            Ok(StageOutcome::Skipped(_)) => {
                self.skipped += 1;
                false
            }
            Err(_) => {
                self.failed += 1;
                false
            }
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

/// Runs pipeline stages over the catalog.
///
/// Batch runs pause after each produced artifact to stay polite to the
/// video host and to keep the machine responsive during transcoding.
pub struct StageRunner {
    catalog: Catalog,
    download_pause: Duration,
    extract_pause: Duration,
}

impl StageRunner {
    /// Runner without pauses.
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            download_pause: Duration::ZERO,
            extract_pause: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(Catalog::from_config(&config.catalog)).with_pauses(
            Duration::from_secs(config.downloader.pause_secs),
            Duration::from_secs(config.extractor.pause_secs),
        )
    }

    pub fn with_pauses(mut self, download: Duration, extract: Duration) -> Self {
        self.download_pause = download;
        self.extract_pause = extract;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn download(
        &self,
        selector: Selector,
        downloader: &dyn VideoDownloader,
    ) -> Result<RunSummary, RunError> {
        downloader
            .check()
            .await
            .map_err(|source| RunError::ToolUnavailable {
                tool: "video downloader",
                source,
            })?;

        self.run_each(
            "download",
            selector,
            self.download_pause,
            async |episode: &mut Episode| Video::new(episode).download(downloader).await,
        )
        .await
    }

    pub async fn extract_audio(
        &self,
        selector: Selector,
        extractor: &dyn AudioExtractor,
    ) -> Result<RunSummary, RunError> {
        extractor
            .check()
            .await
            .map_err(|source| RunError::ToolUnavailable {
                tool: "audio extractor",
                source,
            })?;

        self.run_each(
            "extract",
            selector,
            self.extract_pause,
            async |episode: &mut Episode| Audio::new(episode).extract(extractor).await,
        )
        .await
    }

    /// Starts recognition jobs. Episodes with a job still running at the
    /// vendor are skipped.
    pub async fn recognize(
        &self,
        selector: Selector,
        speech: &dyn SpeechToText,
        callback_url: Option<&str>,
    ) -> Result<RunSummary, RunError> {
        let in_flight = match speech.list_jobs().await {
            Ok(jobs) => in_flight_statuses(&jobs),
            Err(e) => {
                warn!(error = %e, "Could not list recognition jobs, in-process check disabled");
                HashMap::new()
            }
        };

        self.run_each(
            "recognize",
            selector,
            Duration::ZERO,
            async |episode: &mut Episode| {
                if let Some(status) = in_flight.get(&episode.name()) {
                    episode.set_asset_status(AssetType::Recognition, *status)?;
                }
                Recognition::new(episode)
                    .start_job(speech, callback_url)
                    .await
            },
        )
        .await
    }

    pub async fn transcribe(&self, selector: Selector) -> Result<RunSummary, RunError> {
        self.run_each(
            "transcribe",
            selector,
            Duration::ZERO,
            async |episode: &mut Episode| Transcript::new(episode).create().await,
        )
        .await
    }

    pub async fn analyze(
        &self,
        selector: Selector,
        analyzer: &dyn EntityAnalyzer,
        overwrite: bool,
    ) -> Result<RunSummary, RunError> {
        let service = analyzer.service();
        self.run_each(
            "analyze",
            selector,
            Duration::ZERO,
            async |episode: &mut Episode| {
                Analysis::new(episode, service)
                    .create(analyzer, overwrite)
                    .await
            },
        )
        .await
    }

    /// Polls the vendor for finished jobs and stores their results. This is
    /// the alternative to receiving them on the callback server.
    pub async fn collect_recognitions(
        &self,
        selector: Selector,
        speech: &dyn SpeechToText,
    ) -> Result<RunSummary, RunError> {
        selector.validate()?;
        let jobs = speech.list_jobs().await.map_err(RunError::Jobs)?;
        let mut summary = RunSummary::default();

        for job in jobs.iter().filter(|job| job.status == JobStatus::Completed) {
            let Some(token) = job.user_token.as_deref() else {
                debug!(job_id = %job.id, "Ignoring job without user token");
                continue;
            };
            let episode = match self.catalog.episode_from_name(token) {
                Ok(episode) => episode,
                Err(e) => {
                    warn!(job_id = %job.id, token, error = %e, "Ignoring job with unknown token");
                    continue;
                }
            };
            if !selector.matches(episode.season(), episode.number()) {
                continue;
            }

            let span = info_span!(
                "stage",
                stage = "collect",
                season = episode.season(),
                episode = episode.number()
            );
            async {
                let result = collect_one(&episode, &job.id, speech).await;
                log_outcome(&episode.name(), &result);
                summary.record(&result);
            }
            .instrument(span)
            .await;
        }

        info!(
            stage = "collect",
            %selector,
            completed = summary.completed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Stage run finished"
        );
        Ok(summary)
    }

    async fn run_each<F>(
        &self,
        stage: &'static str,
        selector: Selector,
        pause: Duration,
        mut step: F,
    ) -> Result<RunSummary, RunError>
    where
        F: AsyncFnMut(&mut Episode) -> Result<StageOutcome, StageError>,
    {
        let mut summary = RunSummary::default();
        let throttle = !selector.is_single() && !pause.is_zero();

        self.catalog
            .solve(selector, async |episode: &mut Episode| {
                let span = info_span!(
                    "stage",
                    stage,
                    season = episode.season(),
                    episode = episode.number()
                );
                let name = episode.name();
                let produced = async {
                    let result = step(episode).await;
                    log_outcome(&name, &result);
                    summary.record(&result)
                }
                .instrument(span)
                .await;

                if produced && throttle {
                    debug!(pause_secs = pause.as_secs(), "Pausing before next episode");
                    tokio::time::sleep(pause).await;
                }
                Ok::<_, Infallible>(())
            })
            .await?;

        info!(
            stage,
            %selector,
            completed = summary.completed,
            skipped = summary.skipped,
            failed = summary.failed,
            "Stage run finished"
        );
        Ok(summary)
    }
}

async fn collect_one(
    episode: &Episode,
    job_id: &str,
    speech: &dyn SpeechToText,
) -> Result<StageOutcome, StageError> {
    let recognition = Recognition::new(episode);
    if recognition.exists() {
        return Ok(StageOutcome::Skipped(SkipReason::AlreadyExists));
    }
    let job = speech.get_job(job_id).await.map_err(StageError::Speech)?;
    recognition.write_results(&job.results).await?;
    Ok(StageOutcome::Completed)
}

fn log_outcome(name: &str, result: &Result<StageOutcome, StageError>) {
    match result {
        Ok(StageOutcome::Completed) => debug!(episode_name = name, "Stage complete"),
        Ok(StageOutcome::Skipped(reason)) => {
            info!(episode_name = name, %reason, "Skipping")
        }
        Err(e) => error!(episode_name = name, error = %e, "Stage failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_record() {
        let mut summary = RunSummary::default();
        assert!(summary.record(&Ok(StageOutcome::Completed)));
        assert!(!summary.record(&Ok(StageOutcome::Skipped(SkipReason::AlreadyExists))));
        assert!(!summary.record(&Err(StageError::Io(std::io::Error::other("x")))));
        assert_eq!(
            summary,
            RunSummary {
                visited: 3,
                completed: 1,
                skipped: 1,
                failed: 1,
            }
        );
        assert!(summary.has_failures());
    }
}
