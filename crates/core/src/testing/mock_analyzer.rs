//! Mock entity analyzer.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external::{AnalysisService, Entity, EntityAnalyzer, VendorError};

/// Mock implementation of [`EntityAnalyzer`] returning canned entities.
#[derive(Debug)]
pub struct MockEntityAnalyzer {
    service: AnalysisService,
    entities: Arc<RwLock<Vec<Entity>>>,
    texts: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<VendorError>>>,
}

impl MockEntityAnalyzer {
    pub fn new(service: AnalysisService) -> Self {
        Self {
            service,
            entities: Arc::new(RwLock::new(Vec::new())),
            texts: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    /// Entities returned by every subsequent analysis.
    pub async fn set_entities(&self, entities: Vec<Entity>) {
        *self.entities.write().await = entities;
    }

    /// Texts submitted so far.
    pub async fn analyzed_texts(&self) -> Vec<String> {
        self.texts.read().await.clone()
    }

    pub async fn set_next_error(&self, error: VendorError) {
        *self.next_error.write().await = Some(error);
    }
}

#[async_trait]
impl EntityAnalyzer for MockEntityAnalyzer {
    fn service(&self) -> AnalysisService {
        self.service
    }

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, VendorError> {
        self.texts.write().await.push(text.to_string());
        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }
        Ok(self.entities.read().await.clone())
    }
}
