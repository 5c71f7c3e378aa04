//! The JSON manifest listing every episode's title and source URL.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use super::error::CatalogError;

/// Separator between the fields of a manifest record's `name`.
const NAME_SEPARATOR: &str = " | ";

/// One manifest entry, as scraped from the video host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRecord {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl ManifestRecord {
    /// The title segment of `name` (`"<show> | <season> | <title>"`).
    ///
    /// Names with fewer segments yield their last segment.
    pub fn title(&self) -> &str {
        let segments: Vec<&str> = self.name.split(NAME_SEPARATOR).collect();
        segments
            .get(2)
            .or(segments.last())
            .copied()
            .map(str::trim)
            .unwrap_or_default()
    }

    pub fn url(&self) -> Option<String> {
        let url = self.url.trim();
        (!url.is_empty()).then(|| url.to_string())
    }
}

/// Manifest contents keyed by zero-padded season number (`"03"`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    seasons: BTreeMap<String, Vec<ManifestRecord>>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                CatalogError::ManifestNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                CatalogError::ManifestRead {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&contents).map_err(|source| CatalogError::ManifestDecode {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Records of a season in listing order; position + 1 is the episode number.
    pub fn season(&self, season: u32) -> Option<&[ManifestRecord]> {
        self.seasons.get(&season_key(season)).map(Vec::as_slice)
    }

    pub fn insert_season(&mut self, season: u32, records: Vec<ManifestRecord>) {
        self.seasons.insert(season_key(season), records);
    }
}

/// Manifest key of a season.
pub fn season_key(season: u32) -> String {
    format!("{:02}", season)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_record_title_segment() {
        let record = ManifestRecord {
            name: "X | Y | A Title".to_string(),
            url: String::new(),
        };
        assert_eq!(record.title(), "A Title");

        let record = ManifestRecord {
            name: "Only Title".to_string(),
            url: String::new(),
        };
        assert_eq!(record.title(), "Only Title");
    }

    #[test]
    fn test_record_empty_url_is_absent() {
        let record = ManifestRecord {
            name: "a".to_string(),
            url: "  ".to_string(),
        };
        assert_eq!(record.url(), None);
    }

    #[test]
    fn test_load_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"03": [{{"name": "X | Y | A Title", "url": "https://yt/watch?v=abc123"}}, {{"name": "X | Y | B"}}]}}"#
        )
        .unwrap();

        let manifest = Manifest::load(file.path()).unwrap();
        let records = manifest.season(3).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title(), "A Title");
        assert_eq!(records[1].url(), None);
        assert!(manifest.season(4).is_none());
    }

    #[test]
    fn test_load_missing_manifest() {
        let result = Manifest::load(Path::new("/nonexistent/episodes.json"));
        assert!(matches!(result, Err(CatalogError::ManifestNotFound { .. })));
    }

    #[test]
    fn test_load_corrupt_manifest() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let result = Manifest::load(file.path());
        assert!(matches!(result, Err(CatalogError::ManifestDecode { .. })));
    }

    #[test]
    fn test_season_key_is_padded() {
        assert_eq!(season_key(3), "03");
        assert_eq!(season_key(14), "14");
    }
}
