//! A season: the episodes sharing one season number.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::asset::{AssetLayout, AssetType};
use super::episode::{season_dir_name, Episode};
use super::error::CatalogError;
use super::manifest::Manifest;

/// Episodes of one season keyed by episode number.
///
/// A `Season` only exists once its manifest entries were loaded, so an empty
/// season always means the manifest lists no episodes for it.
#[derive(Debug, Clone)]
pub struct Season {
    number: u32,
    layout: Arc<AssetLayout>,
    episodes: BTreeMap<u32, Episode>,
}

impl Season {
    /// Reads the manifest and materializes this season's episodes.
    pub fn load(
        number: u32,
        manifest_path: &Path,
        layout: Arc<AssetLayout>,
    ) -> Result<Self, CatalogError> {
        let manifest = Manifest::load(manifest_path)?;
        Self::from_manifest(number, &manifest, layout)
    }

    /// Materializes this season's episodes from an already decoded manifest.
    pub fn from_manifest(
        number: u32,
        manifest: &Manifest,
        layout: Arc<AssetLayout>,
    ) -> Result<Self, CatalogError> {
        let records = manifest
            .season(number)
            .ok_or(CatalogError::SeasonMissing { season: number })?;

        let episodes = records
            .iter()
            .zip(1u32..)
            .map(|(record, episode_number)| {
                let episode = Episode::new(
                    number,
                    episode_number,
                    record.title(),
                    record.url(),
                    Arc::clone(&layout),
                );
                (episode_number, episode)
            })
            .collect();

        Ok(Self {
            number,
            layout,
            episodes,
        })
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Episodes in ascending episode order.
    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.values()
    }

    pub fn episodes_mut(&mut self) -> impl Iterator<Item = &mut Episode> {
        self.episodes.values_mut()
    }

    pub fn episode(&self, number: u32) -> Option<&Episode> {
        self.episodes.get(&number)
    }

    pub fn episode_mut(&mut self, number: u32) -> Option<&mut Episode> {
        self.episodes.get_mut(&number)
    }

    pub fn episode_count(&self) -> usize {
        self.episodes.len()
    }

    pub fn dir_name(&self) -> String {
        season_dir_name(self.number)
    }

    /// This season's directory inside a stage directory.
    pub fn asset_dir(&self, asset_type: AssetType) -> PathBuf {
        self.layout.stage_dir(asset_type).join(self.dir_name())
    }

    pub fn ensure_dir(&self, asset_type: AssetType) -> std::io::Result<()> {
        std::fs::create_dir_all(self.asset_dir(asset_type))
    }
}
