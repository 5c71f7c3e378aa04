//! Error types for the catalog module.

use std::path::PathBuf;
use thiserror::Error;

use super::asset::{AssetStatus, AssetType};

/// Errors raised while loading seasons or interpreting episode names.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The manifest file does not exist.
    #[error("Episode manifest not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// The manifest file could not be read.
    #[error("Failed to read episode manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest file is not valid JSON of the expected shape.
    #[error("Failed to decode episode manifest {path}: {source}")]
    ManifestDecode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The manifest has no entry list for a season of the catalog.
    #[error("Season {season} is not listed in the episode manifest")]
    SeasonMissing { season: u32 },

    /// A name could not be parsed back into an episode identity.
    #[error("Invalid episode name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The status override was already set on this episode.
    #[error("Status of episode {episode} was already overridden")]
    StatusAlreadySet { episode: String },

    /// The override is not a status the stage can be in.
    #[error("Status '{status}' cannot be assigned to a {asset_type}")]
    InvalidOverride {
        asset_type: AssetType,
        status: AssetStatus,
    },
}

impl CatalogError {
    pub(crate) fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
