//! Catalog fixtures backed by a temporary directory.

use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

use crate::catalog::{AssetLayout, AssetType, Catalog, Episode, Manifest, ManifestRecord};
use crate::external::{
    SpeechRecognitionAlternative, SpeechRecognitionResult, SpeechRecognitionResults,
};

/// File name of the manifest written by [`ManifestBuilder::into_catalog`].
pub const MANIFEST_FILE: &str = "episodes.json";

/// A manifest record in the scraped `"<show> | <season> | <title>"` form.
pub fn record(season: u32, title: &str, url: &str) -> ManifestRecord {
    ManifestRecord {
        name: format!("Casebook | Season {} | {}", season, title),
        url: url.to_string(),
    }
}

/// Watch URL for a fixture episode.
pub fn video_url(season: u32, episode: u32) -> String {
    format!("https://www.youtube.com/watch?v=s{:02}e{:02}", season, episode)
}

/// Builds a manifest and, optionally, a catalog rooted in a temp directory.
#[derive(Debug, Default)]
pub struct ManifestBuilder {
    manifest: Manifest,
    season_count: Option<u32>,
    highest_season: u32,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a season whose episodes all have source URLs.
    pub fn season(self, number: u32, titles: &[&str]) -> Self {
        let records = titles
            .iter()
            .enumerate()
            .map(|(i, title)| record(number, title, &video_url(number, i as u32 + 1)))
            .collect();
        self.season_records(number, records)
    }

    /// Adds a season with explicit records.
    pub fn season_records(mut self, number: u32, records: Vec<ManifestRecord>) -> Self {
        self.manifest.insert_season(number, records);
        self.highest_season = self.highest_season.max(number);
        self
    }

    /// Number of seasons the catalog spans; defaults to the highest added.
    pub fn season_count(mut self, count: u32) -> Self {
        self.season_count = Some(count);
        self
    }

    pub fn build(&self) -> Manifest {
        self.manifest.clone()
    }

    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(&self.manifest).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    /// Writes the manifest into a fresh temp dir and returns a catalog whose
    /// stage directories all live under that dir.
    ///
    /// # Panics
    ///
    /// Panics if the temp dir cannot be created or written.
    pub fn into_catalog(self) -> (TempDir, Catalog) {
        let dir = TempDir::new().expect("create temp dir");
        let manifest_path = dir.path().join(MANIFEST_FILE);
        self.write_to(&manifest_path).expect("write manifest");

        let layout = Arc::new(AssetLayout::single_root(dir.path()));
        let season_count = self.season_count.unwrap_or(self.highest_season.max(1));
        (dir, Catalog::new(layout, manifest_path, season_count))
    }
}

/// Creates the artifact of `asset_type` for `episode` with placeholder content.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn touch_asset(episode: &Episode, asset_type: AssetType) {
    let path = episode.asset_file_path(asset_type);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create stage dir");
    }
    std::fs::write(&path, b"fixture").expect("write asset");
}

/// Recognition results with one final alternative per line.
pub fn recognition_results(lines: &[&str]) -> Vec<SpeechRecognitionResults> {
    vec![SpeechRecognitionResults {
        results: lines
            .iter()
            .map(|line| SpeechRecognitionResult {
                is_final: true,
                alternatives: vec![SpeechRecognitionAlternative {
                    transcript: format!("{} ", line),
                    confidence: Some(0.92),
                }],
            })
            .collect(),
        result_index: Some(0),
    }]
}
