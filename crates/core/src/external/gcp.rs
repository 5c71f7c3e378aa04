//! Google Cloud Natural Language entity analysis.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::types::{AnalysisService, Entity};
use super::{EntityAnalyzer, VendorError};
use crate::config::GcpLanguageConfig;

pub struct GcpLanguageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GcpLanguageClient {
    pub fn new(config: &GcpLanguageConfig) -> Result<Self, VendorError> {
        if config.api_key.is_empty() {
            return Err(VendorError::NotConfigured(
                "GCP language API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl EntityAnalyzer for GcpLanguageClient {
    fn service(&self) -> AnalysisService {
        AnalysisService::Gcp
    }

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, VendorError> {
        let url = format!("{}/documents:analyzeEntities", self.base_url);
        debug!(chars = text.len(), "GCP analyzeEntities");

        let body = AnalyzeEntitiesRequest {
            document: Document {
                kind: "PLAIN_TEXT",
                content: text,
            },
            encoding_type: "UTF8",
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await?;
        let response = VendorError::check_response(response, "analyzeEntities").await?;

        let parsed: AnalyzeEntitiesResponse = response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse entity response: {}", e))
        })?;

        Ok(parsed.into_entities())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeEntitiesRequest<'a> {
    document: Document<'a>,
    encoding_type: &'static str,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeEntitiesResponse {
    #[serde(default)]
    entities: Vec<GcpEntity>,
}

#[derive(Debug, Deserialize)]
struct GcpEntity {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    salience: Option<f64>,
    #[serde(default)]
    mentions: Vec<serde_json::Value>,
}

impl AnalyzeEntitiesResponse {
    fn into_entities(self) -> Vec<Entity> {
        self.entities
            .into_iter()
            .map(|e| Entity {
                name: e.name,
                kind: e.kind,
                salience: e.salience,
                relevance: None,
                mentions: e.mentions.len() as u32,
            })
            .collect()
    }
}
