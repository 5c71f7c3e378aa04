use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub downloader: DownloaderConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub speech: Option<SpeechConfig>,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the manifest and stage artifacts live
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Root of downloaded videos and extracted audio
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Root of recognitions, transcripts and analyses
    #[serde(default = "default_assets_dir")]
    pub investigations_dir: PathBuf,
    /// Episode manifest (JSON keyed by zero-padded season number)
    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,
    /// Number of seasons in the catalog
    #[serde(default = "default_season_count")]
    pub season_count: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            investigations_dir: default_assets_dir(),
            manifest: default_manifest(),
            season_count: default_season_count(),
        }
    }
}

fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}

fn default_manifest() -> PathBuf {
    PathBuf::from("assets/episodes.json")
}

fn default_season_count() -> u32 {
    14
}

/// Video downloader (youtube-dl compatible binary)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloaderConfig {
    #[serde(default = "default_downloader_binary")]
    pub binary: PathBuf,
    /// Arguments inserted before the video handle
    #[serde(default)]
    pub extra_args: Vec<String>,
    /// Pause after each download in batch runs
    #[serde(default = "default_download_pause")]
    pub pause_secs: u64,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            binary: default_downloader_binary(),
            extra_args: Vec::new(),
            pause_secs: default_download_pause(),
        }
    }
}

fn default_downloader_binary() -> PathBuf {
    PathBuf::from("youtube-dl")
}

fn default_download_pause() -> u64 {
    60
}

/// Audio extraction through ffmpeg
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractorConfig {
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,
    /// Pause after each extraction in batch runs
    #[serde(default = "default_extract_pause")]
    pub pause_secs: u64,
    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace)
    #[serde(default = "default_ffmpeg_log_level")]
    pub log_level: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            pause_secs: default_extract_pause(),
            log_level: default_ffmpeg_log_level(),
        }
    }
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_extract_pause() -> u64 {
    30
}

fn default_ffmpeg_log_level() -> String {
    "error".to_string()
}

/// Speech-to-text vendor
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SpeechConfig {
    /// Service instance URL
    pub url: String,
    pub api_key: String,
    /// Public URL the vendor posts finished recognitions to
    #[serde(default)]
    pub callback_url: Option<String>,
    /// Request timeout in seconds (default: 90, audio uploads are large)
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

fn default_speech_timeout() -> u64 {
    90
}

/// Entity analysis vendors
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub gcp: Option<GcpLanguageConfig>,
    #[serde(default)]
    pub ibm: Option<IbmNluConfig>,
}

/// Google Cloud Natural Language
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GcpLanguageConfig {
    pub api_key: String,
    #[serde(default = "default_gcp_base_url")]
    pub base_url: String,
}

fn default_gcp_base_url() -> String {
    "https://language.googleapis.com/v1".to_string()
}

/// IBM Natural Language Understanding
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IbmNluConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_nlu_version")]
    pub version: String,
}

fn default_nlu_version() -> String {
    "2019-07-12".to_string()
}

/// Callback receiver configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    9000
}

/// Log output configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
    /// Default filter directives, overridden by RUST_LOG
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Sanitized config for display (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub catalog: CatalogConfig,
    pub downloader: DownloaderConfig,
    pub extractor: ExtractorConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speech: Option<SanitizedSpeechConfig>,
    pub analysis: SanitizedAnalysisConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

/// Sanitized speech config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedSpeechConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub callback_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAnalysisConfig {
    pub gcp_configured: bool,
    pub ibm_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            catalog: config.catalog.clone(),
            downloader: config.downloader.clone(),
            extractor: config.extractor.clone(),
            speech: config.speech.as_ref().map(|s| SanitizedSpeechConfig {
                url: s.url.clone(),
                api_key_configured: !s.api_key.is_empty(),
                callback_url: s.callback_url.clone(),
                timeout_secs: s.timeout_secs,
            }),
            analysis: SanitizedAnalysisConfig {
                gcp_configured: config
                    .analysis
                    .gcp
                    .as_ref()
                    .is_some_and(|g| !g.api_key.is_empty()),
                ibm_configured: config
                    .analysis
                    .ibm
                    .as_ref()
                    .is_some_and(|i| !i.api_key.is_empty()),
            },
            server: config.server.clone(),
            logging: config.logging.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.catalog.season_count, 14);
        assert_eq!(
            config.catalog.manifest.to_str().unwrap(),
            "assets/episodes.json"
        );
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.downloader.pause_secs, 60);
        assert_eq!(config.extractor.pause_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.speech.is_none());
    }

    #[test]
    fn test_deserialize_catalog_section() {
        let toml = r#"
[catalog]
assets_dir = "/media/assets"
investigations_dir = "/work/investigations"
manifest = "/media/episodes.json"
season_count = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.catalog.season_count, 3);
        assert_eq!(
            config.catalog.investigations_dir.to_str().unwrap(),
            "/work/investigations"
        );
    }

    #[test]
    fn test_deserialize_speech_section() {
        let toml = r#"
[speech]
url = "https://stt.example.com/instances/abc"
api_key = "secret"
callback_url = "https://hooks.example.com/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let speech = config.speech.unwrap();
        assert_eq!(speech.url, "https://stt.example.com/instances/abc");
        assert_eq!(speech.timeout_secs, 90); // default
        assert_eq!(
            speech.callback_url.as_deref(),
            Some("https://hooks.example.com/")
        );
    }

    #[test]
    fn test_deserialize_speech_without_key_fails() {
        let toml = r#"
[speech]
url = "https://stt.example.com"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_analysis_section() {
        let toml = r#"
[analysis.gcp]
api_key = "gcp-key"

[analysis.ibm]
url = "https://nlu.example.com"
api_key = "ibm-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let gcp = config.analysis.gcp.unwrap();
        assert_eq!(gcp.base_url, "https://language.googleapis.com/v1");
        let ibm = config.analysis.ibm.unwrap();
        assert_eq!(ibm.version, "2019-07-12");
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let toml = r#"
[speech]
url = "https://stt.example.com"
api_key = "secret"

[analysis.gcp]
api_key = "gcp-key"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        let speech = sanitized.speech.as_ref().unwrap();
        assert!(speech.api_key_configured);
        assert!(sanitized.analysis.gcp_configured);
        assert!(!sanitized.analysis.ibm_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("gcp-key"));
    }
}
