use std::path::PathBuf;
use tracing::info;

use super::{missing_input, SkipReason, StageError, StageOutcome, Transcript};
use crate::catalog::{AssetType, Episode};
use crate::external::{AnalysisService, Entity, EntityAnalyzer};
use crate::fsutil;

/// Entity analysis of an episode's transcript by one language service.
pub struct Analysis<'a> {
    episode: &'a Episode,
    service: AnalysisService,
}

impl<'a> Analysis<'a> {
    pub fn new(episode: &'a Episode, service: AnalysisService) -> Self {
        Self { episode, service }
    }

    pub fn asset_type(&self) -> AssetType {
        self.service.asset_type()
    }

    pub fn path(&self) -> PathBuf {
        self.episode.asset_file_path(self.asset_type())
    }

    pub fn exists(&self) -> bool {
        self.episode.asset_exists(self.asset_type())
    }

    /// Runs the analysis. An existing result is replaced only with `overwrite`.
    pub async fn create(
        &self,
        analyzer: &dyn EntityAnalyzer,
        overwrite: bool,
    ) -> Result<StageOutcome, StageError> {
        if self.exists() && !overwrite {
            return Ok(StageOutcome::Skipped(SkipReason::AlreadyExists));
        }
        if let Some(skipped) = missing_input(self.episode, AssetType::Transcript) {
            return Ok(skipped);
        }

        let text = Transcript::new(self.episode).read().await?;
        let entities = analyzer
            .analyze_entities(&text)
            .await
            .map_err(StageError::Analysis)?;

        let path = self.path();
        fsutil::write_json_atomic(&path, &entities).await?;
        info!(
            file = %path.display(),
            service = %self.service,
            entities = entities.len(),
            "Analysis written"
        );

        Ok(StageOutcome::Completed)
    }

    pub async fn read(&self) -> Result<Vec<Entity>, StageError> {
        let path = self.path();
        let contents = tokio::fs::read(&path).await?;
        serde_json::from_slice(&contents).map_err(|source| StageError::Json {
            file: path.display().to_string(),
            source,
        })
    }
}
