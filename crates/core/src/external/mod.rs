//! Collaborators the pipeline stages delegate to.
//!
//! Each capability is a narrow trait so stages can be exercised against the
//! mocks in [`crate::testing`]. The real implementations shell out to
//! command line tools (`youtube-dl`, `ffmpeg`) or call vendor HTTP APIs.

mod error;
mod ffmpeg;
mod gcp;
mod ibm;
mod process;
mod types;
mod watson;
mod youtube_dl;

pub use error::{ToolError, VendorError};
pub use ffmpeg::FfmpegExtractor;
pub use gcp::GcpLanguageClient;
pub use ibm::IbmNluClient;
pub use types::*;
pub use watson::WatsonSpeechToText;
pub use youtube_dl::YoutubeDl;

use async_trait::async_trait;
use std::path::Path;

/// Fetches an episode's video from its source URL.
#[async_trait]
pub trait VideoDownloader: Send + Sync {
    /// Downloads `url` into `output`.
    async fn download(&self, url: &str, output: &Path) -> Result<(), ToolError>;

    /// Verifies the downloader is installed.
    async fn check(&self) -> Result<(), ToolError>;
}

/// Strips the audio track out of a downloaded video.
#[async_trait]
pub trait AudioExtractor: Send + Sync {
    async fn extract(&self, video: &Path, output: &Path) -> Result<(), ToolError>;

    async fn check(&self) -> Result<(), ToolError>;
}

/// Asynchronous speech recognition service.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Submits audio for recognition; returns immediately with the job.
    async fn create_job(&self, request: CreateJobRequest) -> Result<RecognitionJob, VendorError>;

    /// Registers (allowlists) a callback URL with the service.
    async fn register_callback(&self, url: &str) -> Result<RegisteredCallback, VendorError>;

    /// Lists recent jobs. Listed jobs carry no results.
    async fn list_jobs(&self) -> Result<Vec<RecognitionJob>, VendorError>;

    /// Fetches a single job, including results once completed.
    async fn get_job(&self, id: &str) -> Result<RecognitionJob, VendorError>;
}

/// Named entity extraction over transcript text.
#[async_trait]
pub trait EntityAnalyzer: Send + Sync {
    /// Which service this is; selects the output stage.
    fn service(&self) -> AnalysisService;

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, VendorError>;
}
