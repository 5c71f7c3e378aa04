//! IBM Watson Speech to Text client (asynchronous recognitions API).
//!
//! Authenticates with HTTP basic auth using the literal user `apikey`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::types::{CreateJobRequest, RecognitionJob, RegisteredCallback};
use super::{SpeechToText, VendorError};
use crate::config::SpeechConfig;

const AUTH_USER: &str = "apikey";

pub struct WatsonSpeechToText {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WatsonSpeechToText {
    pub fn new(config: &SpeechConfig) -> Result<Self, VendorError> {
        if config.api_key.is_empty() {
            return Err(VendorError::NotConfigured(
                "speech-to-text API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_url, path)
    }
}

/// Query parameters for a new recognition job.
fn create_job_query(request: &CreateJobRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("user_token", request.user_token.clone()),
        ("profanity_filter", request.profanity_filter.to_string()),
    ];
    if let Some(callback_url) = &request.callback_url {
        query.push(("callback_url", callback_url.clone()));
        query.push(("events", request.events.clone()));
    }
    query
}

#[async_trait]
impl SpeechToText for WatsonSpeechToText {
    async fn create_job(&self, request: CreateJobRequest) -> Result<RecognitionJob, VendorError> {
        debug!(
            user_token = %request.user_token,
            bytes = request.audio.len(),
            "Creating recognition job"
        );

        let response = self
            .client
            .post(self.endpoint("recognitions"))
            .basic_auth(AUTH_USER, Some(&self.api_key))
            .query(&create_job_query(&request))
            .header(reqwest::header::CONTENT_TYPE, request.content_type.as_str())
            .body(request.audio)
            .send()
            .await?;
        let response = VendorError::check_response(response, "recognitions").await?;

        response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse recognition job: {}", e))
        })
    }

    async fn register_callback(&self, url: &str) -> Result<RegisteredCallback, VendorError> {
        debug!(callback_url = %url, "Registering callback");

        let response = self
            .client
            .post(self.endpoint("register_callback"))
            .basic_auth(AUTH_USER, Some(&self.api_key))
            .query(&[("callback_url", url)])
            .send()
            .await?;
        let response = VendorError::check_response(response, "register_callback").await?;

        response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse callback registration: {}", e))
        })
    }

    async fn list_jobs(&self) -> Result<Vec<RecognitionJob>, VendorError> {
        let response = self
            .client
            .get(self.endpoint("recognitions"))
            .basic_auth(AUTH_USER, Some(&self.api_key))
            .send()
            .await?;
        let response = VendorError::check_response(response, "recognitions").await?;

        let list: RecognitionList = response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse recognition list: {}", e))
        })?;
        Ok(list.recognitions)
    }

    async fn get_job(&self, id: &str) -> Result<RecognitionJob, VendorError> {
        let response = self
            .client
            .get(self.endpoint(&format!("recognitions/{}", id)))
            .basic_auth(AUTH_USER, Some(&self.api_key))
            .send()
            .await?;
        let response =
            VendorError::check_response(response, &format!("recognition {}", id)).await?;

        response.json().await.map_err(|e| {
            VendorError::ParseError(format!("Failed to parse recognition job: {}", e))
        })
    }
}

#[derive(Debug, Deserialize)]
struct RecognitionList {
    #[serde(default)]
    recognitions: Vec<RecognitionJob>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::JobStatus;

    fn config() -> SpeechConfig {
        SpeechConfig {
            url: "https://api.us-south.speech-to-text.watson.cloud.ibm.com/instances/abc/"
                .to_string(),
            api_key: "secret".to_string(),
            callback_url: None,
            timeout_secs: 90,
        }
    }

    #[test]
    fn test_requires_api_key() {
        let config = SpeechConfig {
            api_key: String::new(),
            ..config()
        };
        assert!(matches!(
            WatsonSpeechToText::new(&config),
            Err(VendorError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = WatsonSpeechToText::new(&config()).unwrap();
        assert_eq!(
            client.endpoint("recognitions"),
            "https://api.us-south.speech-to-text.watson.cloud.ibm.com/instances/abc/v1/recognitions"
        );
    }

    #[test]
    fn test_query_without_callback_omits_events() {
        let request = CreateJobRequest {
            audio: vec![],
            content_type: "audio/mp3".to_string(),
            callback_url: None,
            user_token: "01-02-title".to_string(),
            events: "recognitions.completed_with_results".to_string(),
            profanity_filter: false,
        };
        let query = create_job_query(&request);
        assert!(query.iter().all(|(k, _)| *k != "events"));
        assert!(query.contains(&("user_token", "01-02-title".to_string())));
        assert!(query.contains(&("profanity_filter", "false".to_string())));
    }

    #[test]
    fn test_query_with_callback() {
        let request = CreateJobRequest {
            audio: vec![],
            content_type: "audio/mp3".to_string(),
            callback_url: Some("https://hooks.example.com/".to_string()),
            user_token: "01-02-title".to_string(),
            events: "recognitions.completed_with_results".to_string(),
            profanity_filter: false,
        };
        let query = create_job_query(&request);
        assert!(query.contains(&("callback_url", "https://hooks.example.com/".to_string())));
        assert!(query.contains(&(
            "events",
            "recognitions.completed_with_results".to_string()
        )));
    }

    #[test]
    fn test_parse_recognition_list() {
        let json = r#"{"recognitions": [
            {"id": "a", "status": "waiting", "user_token": "01-01-x"},
            {"id": "b", "status": "completed", "user_token": "01-02-y"}
        ]}"#;
        let list: RecognitionList = serde_json::from_str(json).unwrap();
        assert_eq!(list.recognitions.len(), 2);
        assert_eq!(list.recognitions[0].status, JobStatus::Waiting);
    }
}
