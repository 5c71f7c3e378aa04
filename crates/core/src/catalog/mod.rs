//! The episode catalog and the files each episode owns.
//!
//! The filesystem is the only store: an episode's stage status is derived
//! by checking whether the stage's artifact exists, every time it is asked.
//! Seasons are materialized from the manifest on demand and never cached
//! across runs.

mod asset;
mod episode;
mod error;
mod manifest;
mod season;

pub use asset::{AssetLayout, AssetStatus, AssetType};
pub use episode::{season_dir_name, slugify, Episode, EpisodeName};
pub use error::CatalogError;
pub use manifest::{season_key, Manifest, ManifestRecord};
pub use season::Season;

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::CatalogConfig;

/// Handle on the whole catalog: seasons `1..=season_count` of one manifest.
#[derive(Debug, Clone)]
pub struct Catalog {
    layout: Arc<AssetLayout>,
    manifest_path: PathBuf,
    season_count: u32,
}

impl Catalog {
    pub fn new(layout: Arc<AssetLayout>, manifest_path: impl Into<PathBuf>, season_count: u32) -> Self {
        Self {
            layout,
            manifest_path: manifest_path.into(),
            season_count,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            Arc::new(AssetLayout::from_config(config)),
            &config.manifest,
            config.season_count,
        )
    }

    pub fn layout(&self) -> &Arc<AssetLayout> {
        &self.layout
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn season_count(&self) -> u32 {
        self.season_count
    }

    pub fn season_numbers(&self) -> RangeInclusive<u32> {
        1..=self.season_count
    }

    pub fn load_season(&self, number: u32) -> Result<Season, CatalogError> {
        Season::load(number, &self.manifest_path, Arc::clone(&self.layout))
    }

    /// Episode located by name alone, for matching vendor responses.
    pub fn episode_from_name(&self, name: &str) -> Result<Episode, CatalogError> {
        Episode::from_name(name, Arc::clone(&self.layout))
    }
}
