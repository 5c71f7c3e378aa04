//! Test doubles for the external collaborators, plus catalog fixtures.
//!
//! The mocks record every call and write placeholder artifacts where the real
//! tool would, so stage and status code can be exercised end to end in a
//! temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use casebook_core::testing::{fixtures::ManifestBuilder, MockDownloader};
//!
//! let (_dir, catalog) = ManifestBuilder::new().season(1, &["Pilot"]).into_catalog();
//! let downloader = MockDownloader::new();
//! StageRunner::new(catalog).download(Selector::all(), &downloader).await?;
//! assert_eq!(downloader.download_count().await, 1);
//! ```

pub mod fixtures;
mod mock_analyzer;
mod mock_downloader;
mod mock_extractor;
mod mock_speech;

pub use mock_analyzer::MockEntityAnalyzer;
pub use mock_downloader::{MockDownloader, RecordedDownload};
pub use mock_extractor::{MockExtractor, RecordedExtraction};
pub use mock_speech::{MockSpeechToText, RecordedJobRequest};
