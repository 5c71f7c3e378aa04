//! A single episode and the files it owns in each pipeline stage.

use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::asset::{AssetLayout, AssetStatus, AssetType};
use super::error::CatalogError;

/// Identity recovered from an episode name such as `03-02-knot-for-everyone`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EpisodeName {
    pub season: u32,
    pub episode: u32,
    pub title: String,
}

impl fmt::Display for EpisodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02}-{}", self.season, self.episode, self.title)
    }
}

/// One unit of work in the catalog.
///
/// Status for a stage is derived from the filesystem unless an override was
/// recorded with [`Episode::set_asset_status`]; the override wins for the
/// rest of this instance's life.
#[derive(Debug, Clone)]
pub struct Episode {
    season: u32,
    number: u32,
    title: String,
    url: Option<String>,
    layout: Arc<AssetLayout>,
    status_override: Option<(AssetType, AssetStatus)>,
}

impl Episode {
    /// Creates an episode. The title is normalised with [`slugify`]; an empty
    /// URL counts as no URL.
    pub fn new(
        season: u32,
        number: u32,
        title: &str,
        url: Option<String>,
        layout: Arc<AssetLayout>,
    ) -> Self {
        Self {
            season,
            number,
            title: slugify(title),
            url: url.filter(|u| !u.trim().is_empty()),
            layout,
            status_override: None,
        }
    }

    /// Parses a name produced by [`Episode::name`] back into its identity.
    ///
    /// Directory components and a trailing stage extension are ignored, so
    /// file paths and vendor job tokens parse the same way.
    pub fn parse_name(name: &str) -> Result<EpisodeName, CatalogError> {
        let trimmed = name.trim();
        let base = Path::new(trimmed)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(trimmed);
        let base = strip_stage_ext(base);

        let mut parts = base.splitn(3, '-');
        let season = parse_number(name, "season", parts.next())?;
        let episode = parse_number(name, "episode", parts.next())?;
        let title = parts.next().unwrap_or_default().to_string();

        Ok(EpisodeName {
            season,
            episode,
            title,
        })
    }

    /// Builds an episode from a parsed name. It carries no URL, so its derived
    /// status is always `Missing`; it is meant for locating files.
    pub fn from_name(name: &str, layout: Arc<AssetLayout>) -> Result<Self, CatalogError> {
        let parsed = Self::parse_name(name)?;
        Ok(Self {
            season: parsed.season,
            number: parsed.episode,
            title: parsed.title,
            url: None,
            layout,
            status_override: None,
        })
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Title slug, as used in file names.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn layout(&self) -> &AssetLayout {
        &self.layout
    }

    /// Canonical name `SS-EE-title`, also used as the vendor job token.
    pub fn name(&self) -> String {
        self.identity().to_string()
    }

    pub fn identity(&self) -> EpisodeName {
        EpisodeName {
            season: self.season,
            episode: self.number,
            title: self.title.clone(),
        }
    }

    /// Title with spaces and title case, for display only.
    pub fn display_title(&self) -> String {
        self.title
            .split('-')
            .filter(|word| !word.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The `v` query parameter of the source URL, used as the download handle.
    pub fn video_hash(&self) -> Option<String> {
        let url = Url::parse(self.url.as_deref()?).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    }

    pub fn asset_file_name(&self, asset_type: AssetType) -> String {
        format!("{}{}", self.name(), asset_type.file_ext())
    }

    pub fn asset_dir(&self, asset_type: AssetType) -> PathBuf {
        self.layout
            .stage_dir(asset_type)
            .join(season_dir_name(self.season))
    }

    pub fn asset_file_path(&self, asset_type: AssetType) -> PathBuf {
        self.asset_dir(asset_type)
            .join(self.asset_file_name(asset_type))
    }

    pub fn asset_exists(&self, asset_type: AssetType) -> bool {
        self.asset_file_path(asset_type).is_file()
    }

    /// Status of the stage, honouring an override for that stage.
    pub fn asset_status(&self, asset_type: AssetType) -> AssetStatus {
        match self.status_override {
            Some((overridden, status)) if overridden == asset_type => status,
            _ => self.derived_status(asset_type),
        }
    }

    /// Status from observation alone: no URL means `Missing` regardless of
    /// what is on disk, otherwise the artifact decides.
    pub fn derived_status(&self, asset_type: AssetType) -> AssetStatus {
        if self.url.is_none() {
            AssetStatus::Missing
        } else if self.asset_exists(asset_type) {
            AssetStatus::Complete
        } else {
            AssetStatus::Pending
        }
    }

    /// Records an externally observed status. Can be set once per instance.
    pub fn set_asset_status(
        &mut self,
        asset_type: AssetType,
        status: AssetStatus,
    ) -> Result<(), CatalogError> {
        if status == AssetStatus::Any
            || (status == AssetStatus::InProcess && !asset_type.supports_in_process())
        {
            return Err(CatalogError::InvalidOverride { asset_type, status });
        }
        if self.status_override.is_some() {
            return Err(CatalogError::StatusAlreadySet {
                episode: self.name(),
            });
        }
        self.status_override = Some((asset_type, status));
        Ok(())
    }

    pub fn status_override(&self) -> Option<(AssetType, AssetStatus)> {
        self.status_override
    }
}

/// Directory name holding one season's files inside a stage directory.
pub fn season_dir_name(season: u32) -> String {
    format!("season-{}", season)
}

/// Lowercases a title and joins its words with single hyphens.
///
/// Whitespace, `-` and `_` separate words; any other punctuation is dropped.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_separator = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_separator = true;
        }
    }

    slug
}

fn strip_stage_ext(base: &str) -> &str {
    AssetType::ALL
        .iter()
        .find_map(|t| base.strip_suffix(t.file_ext()))
        .unwrap_or(base)
}

fn parse_number(name: &str, field: &str, value: Option<&str>) -> Result<u32, CatalogError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CatalogError::invalid_name(name, format!("missing {} number", field)))?;
    value.parse::<u32>().map_err(|_| {
        CatalogError::invalid_name(name, format!("{} '{}' is not a number", field, value))
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout(root: &Path) -> Arc<AssetLayout> {
        Arc::new(AssetLayout::single_root(root))
    }

    fn episode(root: &Path, url: Option<&str>) -> Episode {
        Episode::new(3, 1, "A Title", url.map(String::from), layout(root))
    }

    #[test]
    fn test_name_is_zero_padded() {
        let ep = episode(Path::new("/assets"), None);
        assert_eq!(ep.name(), "03-01-a-title");

        let ep = Episode::new(12, 25, "knot for everyone", None, layout(Path::new("/a")));
        assert_eq!(ep.name(), "12-25-knot-for-everyone");
    }

    #[test]
    fn test_parse_name_round_trip() {
        for (season, number, title) in [(1, 1, "a"), (3, 2, "knot-for-everyone"), (99, 99, "x-y-z")]
        {
            let ep = Episode::new(season, number, title, None, layout(Path::new("/a")));
            let parsed = Episode::parse_name(&ep.name()).unwrap();
            assert_eq!(
                parsed,
                EpisodeName {
                    season,
                    episode: number,
                    title: title.to_string()
                }
            );
        }
    }

    #[test]
    fn test_parse_name_strips_path_and_extension() {
        let parsed = Episode::parse_name("/data/audio/season-8/08-11-a-wrong-foot.mp3").unwrap();
        assert_eq!(parsed.season, 8);
        assert_eq!(parsed.episode, 11);
        assert_eq!(parsed.title, "a-wrong-foot");

        let parsed = Episode::parse_name("08-11-a-wrong-foot.json").unwrap();
        assert_eq!(parsed.title, "a-wrong-foot");
    }

    #[test]
    fn test_parse_name_rejects_non_numeric_fields() {
        assert!(matches!(
            Episode::parse_name("xx-01-title"),
            Err(CatalogError::InvalidName { .. })
        ));
        assert!(matches!(
            Episode::parse_name("01-yy-title"),
            Err(CatalogError::InvalidName { .. })
        ));
        assert!(Episode::parse_name("").is_err());
        assert!(Episode::parse_name("05").is_err());
    }

    #[test]
    fn test_display_title() {
        let ep = Episode::new(1, 1, "the-disappearance-of-helle", None, layout(Path::new("/a")));
        assert_eq!(ep.display_title(), "The Disappearance Of Helle");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("A Title"), "a-title");
        assert_eq!(slugify("  Knot  for Everyone "), "knot-for-everyone");
        assert_eq!(slugify("Who's Guilty? (Part 2)"), "whos-guilty-part-2");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("snake_case--title"), "snake-case-title");
    }

    #[test]
    fn test_video_hash() {
        let ep = episode(Path::new("/a"), Some("https://www.youtube.com/watch?v=abc123&t=5"));
        assert_eq!(ep.video_hash().as_deref(), Some("abc123"));

        let ep = episode(Path::new("/a"), Some("https://www.youtube.com/watch"));
        assert_eq!(ep.video_hash(), None);

        let ep = episode(Path::new("/a"), None);
        assert_eq!(ep.video_hash(), None);
    }

    #[test]
    fn test_asset_file_path() {
        let ep = episode(Path::new("/assets"), None);
        assert_eq!(
            ep.asset_file_path(AssetType::Video),
            PathBuf::from("/assets/videos/season-3/03-01-a-title.mp4")
        );
        assert_eq!(
            ep.asset_file_name(AssetType::Recognition),
            "03-01-a-title.json"
        );
    }

    #[test]
    fn test_status_follows_filesystem() {
        let dir = TempDir::new().unwrap();
        let ep = episode(dir.path(), Some("https://yt/watch?v=abc123"));
        assert_eq!(ep.asset_status(AssetType::Video), AssetStatus::Pending);

        let path = ep.asset_file_path(AssetType::Video);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"video").unwrap();
        assert_eq!(ep.asset_status(AssetType::Video), AssetStatus::Complete);
        assert_eq!(ep.asset_status(AssetType::Audio), AssetStatus::Pending);
    }

    #[test]
    fn test_missing_url_wins_over_stray_file() {
        let dir = TempDir::new().unwrap();
        let ep = episode(dir.path(), Some("   "));
        let path = ep.asset_file_path(AssetType::Video);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, b"stray").unwrap();

        for asset_type in AssetType::ALL {
            assert_eq!(ep.asset_status(asset_type), AssetStatus::Missing);
        }
    }

    #[test]
    fn test_override_applies_to_its_stage_only() {
        let dir = TempDir::new().unwrap();
        let mut ep = episode(dir.path(), Some("https://yt/watch?v=abc"));
        ep.set_asset_status(AssetType::Recognition, AssetStatus::InProcess)
            .unwrap();
        assert_eq!(
            ep.asset_status(AssetType::Recognition),
            AssetStatus::InProcess
        );
        assert_eq!(ep.asset_status(AssetType::Audio), AssetStatus::Pending);
        assert_eq!(
            ep.derived_status(AssetType::Recognition),
            AssetStatus::Pending
        );
    }

    #[test]
    fn test_override_set_once() {
        let mut ep = episode(Path::new("/a"), Some("https://yt/watch?v=abc"));
        ep.set_asset_status(AssetType::Recognition, AssetStatus::InProcess)
            .unwrap();
        let result = ep.set_asset_status(AssetType::Recognition, AssetStatus::Complete);
        assert!(matches!(result, Err(CatalogError::StatusAlreadySet { .. })));
    }

    #[test]
    fn test_override_rejects_meaningless_statuses() {
        let mut ep = episode(Path::new("/a"), None);
        assert!(matches!(
            ep.set_asset_status(AssetType::Video, AssetStatus::InProcess),
            Err(CatalogError::InvalidOverride { .. })
        ));
        assert!(matches!(
            ep.set_asset_status(AssetType::Recognition, AssetStatus::Any),
            Err(CatalogError::InvalidOverride { .. })
        ));
        assert!(ep.status_override().is_none());
    }

    #[test]
    fn test_from_name_locates_files() {
        let ep = Episode::from_name("03-01-a-title", layout(Path::new("/assets"))).unwrap();
        assert_eq!(
            ep.asset_file_path(AssetType::Recognition),
            PathBuf::from("/assets/recognitions/season-3/03-01-a-title.json")
        );
        assert_eq!(ep.asset_status(AssetType::Recognition), AssetStatus::Missing);
    }
}
