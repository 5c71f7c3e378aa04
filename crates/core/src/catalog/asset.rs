//! Pipeline stage tags and the directory layout they map to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::CatalogConfig;

/// One stage of the pipeline, each producing a single file per episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetType {
    Video,
    Audio,
    Recognition,
    Transcript,
    GcpAnalysis,
    IbmAnalysis,
}

impl AssetType {
    /// All stage tags in pipeline order.
    pub const ALL: [AssetType; 6] = [
        AssetType::Video,
        AssetType::Audio,
        AssetType::Recognition,
        AssetType::Transcript,
        AssetType::GcpAnalysis,
        AssetType::IbmAnalysis,
    ];

    /// Name of the stage directory under its root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Video => "videos",
            Self::Audio => "audio",
            Self::Recognition => "recognitions",
            Self::Transcript => "transcripts",
            Self::GcpAnalysis => "gcp-analyses",
            Self::IbmAnalysis => "ibm-analyses",
        }
    }

    /// File extension (with leading dot) of the stage's artifacts.
    pub fn file_ext(&self) -> &'static str {
        match self {
            Self::Video => ".mp4",
            Self::Audio => ".mp3",
            Self::Transcript => ".txt",
            Self::Recognition | Self::GcpAnalysis | Self::IbmAnalysis => ".json",
        }
    }

    /// Whether the stage can be observed as running at an external vendor.
    pub fn supports_in_process(&self) -> bool {
        matches!(self, Self::Recognition)
    }

    /// Whether artifacts live under the raw assets root (as opposed to the
    /// investigations root).
    fn is_raw_media(&self) -> bool {
        matches!(self, Self::Video | Self::Audio)
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Recognition => "recognition",
            Self::Transcript => "transcript",
            Self::GcpAnalysis => "gcp analysis",
            Self::IbmAnalysis => "ibm analysis",
        };
        f.write_str(s)
    }
}

/// Processing status of one stage for one episode.
///
/// `Any` is a filter wildcard and is never produced by derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssetStatus {
    Any,
    Pending,
    InProcess,
    Complete,
    Missing,
}

impl AssetStatus {
    /// Statuses an episode can actually be in.
    pub const CONCRETE: [AssetStatus; 4] = [
        AssetStatus::Pending,
        AssetStatus::InProcess,
        AssetStatus::Complete,
        AssetStatus::Missing,
    ];

    /// Whether `status` passes this value used as a filter.
    pub fn matches(&self, status: AssetStatus) -> bool {
        *self == AssetStatus::Any || *self == status
    }

    /// Human readable label used in reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Any => "Any",
            Self::Pending => "Pending",
            Self::InProcess => "In Process",
            Self::Complete => "Complete",
            Self::Missing => "Missing",
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Any => "any",
            Self::Pending => "pending",
            Self::InProcess => "in-process",
            Self::Complete => "complete",
            Self::Missing => "missing",
        };
        f.write_str(s)
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "pending" => Ok(Self::Pending),
            "in-process" | "in_process" | "inprocess" => Ok(Self::InProcess),
            "complete" => Ok(Self::Complete),
            "missing" => Ok(Self::Missing),
            other => Err(format!("unknown asset status: {}", other)),
        }
    }
}

/// Where each stage's artifacts are stored.
///
/// Built once from configuration and shared by every episode of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLayout {
    assets_dir: PathBuf,
    investigations_dir: PathBuf,
}

impl AssetLayout {
    pub fn new(assets_dir: impl Into<PathBuf>, investigations_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            investigations_dir: investigations_dir.into(),
        }
    }

    /// Layout with both roots in the same directory.
    pub fn single_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(root.clone(), root)
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(&config.assets_dir, &config.investigations_dir)
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    pub fn investigations_dir(&self) -> &Path {
        &self.investigations_dir
    }

    /// Directory holding every season directory of the given stage.
    pub fn stage_dir(&self, asset_type: AssetType) -> PathBuf {
        let root = if asset_type.is_raw_media() {
            &self.assets_dir
        } else {
            &self.investigations_dir
        };
        root.join(asset_type.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_type_has_distinct_dir() {
        let mut dirs: Vec<_> = AssetType::ALL.iter().map(|t| t.dir_name()).collect();
        dirs.sort();
        dirs.dedup();
        assert_eq!(dirs.len(), AssetType::ALL.len());
    }

    #[test]
    fn test_file_extensions() {
        assert_eq!(AssetType::Video.file_ext(), ".mp4");
        assert_eq!(AssetType::Audio.file_ext(), ".mp3");
        assert_eq!(AssetType::Transcript.file_ext(), ".txt");
        assert_eq!(AssetType::Recognition.file_ext(), ".json");
        assert_eq!(AssetType::GcpAnalysis.file_ext(), ".json");
    }

    #[test]
    fn test_stage_dir_roots() {
        let layout = AssetLayout::new("/media", "/work");
        assert_eq!(
            layout.stage_dir(AssetType::Video),
            PathBuf::from("/media/videos")
        );
        assert_eq!(
            layout.stage_dir(AssetType::Audio),
            PathBuf::from("/media/audio")
        );
        assert_eq!(
            layout.stage_dir(AssetType::Transcript),
            PathBuf::from("/work/transcripts")
        );
        assert_eq!(
            layout.stage_dir(AssetType::IbmAnalysis),
            PathBuf::from("/work/ibm-analyses")
        );
    }

    #[test]
    fn test_status_parse_and_display() {
        for status in AssetStatus::CONCRETE {
            let parsed: AssetStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
        assert_eq!("any".parse::<AssetStatus>().unwrap(), AssetStatus::Any);
        assert!("done".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn test_any_matches_everything() {
        for status in AssetStatus::CONCRETE {
            assert!(AssetStatus::Any.matches(status));
        }
        assert!(AssetStatus::Pending.matches(AssetStatus::Pending));
        assert!(!AssetStatus::Pending.matches(AssetStatus::Complete));
    }
}
