//! Pipeline stages.
//!
//! Each stage is a thin wrapper around an [`Episode`] that knows where its
//! artifact lives, what it needs as input, and how to produce it with the
//! matching collaborator from [`crate::external`]. Stages never overwrite a
//! finished artifact unless asked to, and every artifact is written through
//! a staging file so a half-written file is never mistaken for a complete one.

mod analysis;
mod audio;
mod recognition;
mod runner;
mod transcript;
mod video;

pub use analysis::Analysis;
pub use audio::Audio;
pub use recognition::{in_flight_statuses, Recognition};
pub use runner::{RunError, RunSummary, StageRunner};
pub use transcript::{normalize_years, transcript_text, Transcript};
pub use video::Video;

use std::fmt;
use std::ops::AsyncFnOnce;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::catalog::{AssetType, CatalogError, Episode};
use crate::external::{ToolError, VendorError};
use crate::fsutil::{self, JsonWriteError};

/// Result of running one stage on one episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The artifact was produced (or the remote job was started).
    Completed,
    Skipped(SkipReason),
}

/// Why a stage did nothing for an episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyExists,
    /// The episode has no source URL in the manifest.
    NoSourceUrl,
    /// The artifact of an earlier stage is not there yet.
    MissingInput(AssetType),
    /// A recognition job for the episode is still running.
    InProcess,
    /// The recognition held no speech.
    EmptyRecognition,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyExists => write!(f, "already exists"),
            Self::NoSourceUrl => write!(f, "no source URL"),
            Self::MissingInput(asset_type) => write!(f, "{} not found", asset_type),
            Self::InProcess => write!(f, "recognition job in process"),
            Self::EmptyRecognition => write!(f, "recognition has no results"),
        }
    }
}

/// Per-episode stage failures.
#[derive(Debug, Error)]
pub enum StageError {
    #[error("Download failed: {0}")]
    Download(#[source] ToolError),

    #[error("Audio extraction failed: {0}")]
    Extract(#[source] ToolError),

    #[error("Speech-to-text request failed: {0}")]
    Speech(#[source] VendorError),

    #[error("Entity analysis failed: {0}")]
    Analysis(#[source] VendorError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid JSON in {file}: {source}")]
    Json {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<JsonWriteError> for StageError {
    fn from(err: JsonWriteError) -> Self {
        match err {
            JsonWriteError::Encode(e) => StageError::Encode(e),
            JsonWriteError::Io(e) => StageError::Io(e),
        }
    }
}

/// Produces `final_path` by running `make` against a staging path, then
/// renaming the result into place. A failed `make` leaves nothing behind.
pub(crate) async fn produce<F>(final_path: &Path, make: F) -> Result<(), StageError>
where
    F: AsyncFnOnce(&Path) -> Result<(), StageError>,
{
    fsutil::ensure_parent_dir(final_path).await?;
    let staging = fsutil::staging_path(final_path);

    if let Err(e) = make(&staging).await {
        if let Err(discard_err) = fsutil::discard(&staging).await {
            warn!(
                path = %staging.display(),
                error = %discard_err,
                "Failed to remove staging file"
            );
        }
        return Err(e);
    }

    fsutil::promote(&staging, final_path).await?;
    Ok(())
}

/// Shared skip check: the artifact for `asset_type` is already there.
fn already_exists(episode: &Episode, asset_type: AssetType) -> Option<StageOutcome> {
    episode
        .asset_exists(asset_type)
        .then_some(StageOutcome::Skipped(SkipReason::AlreadyExists))
}

/// Shared skip check: the input artifact of `asset_type` is missing.
fn missing_input(episode: &Episode, asset_type: AssetType) -> Option<StageOutcome> {
    (!episode.asset_exists(asset_type))
        .then_some(StageOutcome::Skipped(SkipReason::MissingInput(asset_type)))
}
