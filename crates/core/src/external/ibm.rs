//! IBM Watson Natural Language Understanding entity analysis.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

use super::types::{AnalysisService, Entity};
use super::{EntityAnalyzer, VendorError};
use crate::config::IbmNluConfig;

/// Upper bound on entities returned per document.
const ENTITY_LIMIT: u32 = 250;

pub struct IbmNluClient {
    client: Client,
    base_url: String,
    api_key: String,
    version: String,
}

impl IbmNluClient {
    pub fn new(config: &IbmNluConfig) -> Result<Self, VendorError> {
        if config.api_key.is_empty() {
            return Err(VendorError::NotConfigured(
                "NLU API key is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            version: config.version.clone(),
        })
    }
}

fn analyze_body(text: &str) -> serde_json::Value {
    json!({
        "text": text,
        "language": "en",
        "features": { "entities": { "limit": ENTITY_LIMIT } }
    })
}

#[async_trait]
impl EntityAnalyzer for IbmNluClient {
    fn service(&self) -> AnalysisService {
        AnalysisService::Ibm
    }

    async fn analyze_entities(&self, text: &str) -> Result<Vec<Entity>, VendorError> {
        let url = format!("{}/v1/analyze", self.base_url);
        debug!(chars = text.len(), version = %self.version, "NLU analyze");

        let response = self
            .client
            .post(&url)
            .basic_auth("apikey", Some(&self.api_key))
            .query(&[("version", &self.version)])
            .json(&analyze_body(text))
            .send()
            .await?;
        let response = VendorError::check_response(response, "analyze").await?;

        let parsed: AnalyzeResponse = response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse NLU response: {}", e))
        })?;

        Ok(parsed.into_entities())
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    entities: Vec<NluEntity>,
}

#[derive(Debug, Deserialize)]
struct NluEntity {
    text: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    relevance: Option<f64>,
    #[serde(default)]
    count: u32,
}

impl AnalyzeResponse {
    fn into_entities(self) -> Vec<Entity> {
        self.entities
            .into_iter()
            .map(|e| Entity {
                name: e.text,
                kind: e.kind,
                salience: None,
                relevance: e.relevance,
                mentions: e.count,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "usage": {"text_units": 1, "text_characters": 1188, "features": 1},
            "language": "en",
            "entities": [
                {"type": "Person", "text": "Gary Ridgway", "relevance": 0.97, "count": 4},
                {"type": "Location", "text": "Green River", "relevance": 0.5, "count": 1}
            ]
        }"#;
        let parsed: AnalyzeResponse = serde_json::from_str(json).unwrap();
        let entities = parsed.into_entities();
        assert_eq!(entities[0].name, "Gary Ridgway");
        assert_eq!(entities[0].mentions, 4);
        assert_eq!(entities[1].kind, "Location");
        assert_eq!(entities[1].salience, None);
    }

    #[test]
    fn test_body_requests_entities() {
        let body = analyze_body("some text");
        assert_eq!(body["text"], "some text");
        assert_eq!(body["features"]["entities"]["limit"], 250);
    }

    #[test]
    fn test_missing_entities_is_empty() {
        let parsed: AnalyzeResponse = serde_json::from_str(r#"{"language": "en"}"#).unwrap();
        assert!(parsed.into_entities().is_empty());
    }
}
