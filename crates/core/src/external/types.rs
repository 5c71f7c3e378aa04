//! Data exchanged with the speech-to-text and language analysis vendors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{AssetStatus, AssetType};

/// Event name requesting that results be delivered with the callback.
pub const EVENT_COMPLETED_WITH_RESULTS: &str = "recognitions.completed_with_results";

/// Request to start an asynchronous recognition job.
#[derive(Debug, Clone)]
pub struct CreateJobRequest {
    pub audio: Vec<u8>,
    pub content_type: String,
    /// Where the vendor posts the finished job; `None` means poll for it.
    pub callback_url: Option<String>,
    /// Opaque token echoed back by the vendor; the episode name.
    pub user_token: String,
    pub events: String,
    pub profanity_filter: bool,
}

/// Lifecycle state of a recognition job at the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Waiting,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// Whether the vendor is still working on the job.
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Waiting | Self::Processing)
    }

    /// The episode status this job state implies, if any.
    pub fn asset_status(&self) -> Option<AssetStatus> {
        self.is_running().then_some(AssetStatus::InProcess)
    }
}

/// A recognition job as reported by the vendor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<SpeechRecognitionResults>,
}

/// Body posted to the callback URL when a job finishes.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecognitionCallback {
    pub id: String,
    pub event: String,
    #[serde(default)]
    pub user_token: Option<String>,
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResults>,
}

/// One block of recognition output; the recognition file stores a list of these.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecognitionResults {
    #[serde(default)]
    pub results: Vec<SpeechRecognitionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecognitionResult {
    #[serde(rename = "final", default)]
    pub is_final: bool,
    #[serde(default)]
    pub alternatives: Vec<SpeechRecognitionAlternative>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechRecognitionAlternative {
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// Result of registering a callback URL with the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredCallback {
    pub status: String,
    pub url: String,
}

/// Language service used for entity analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisService {
    Gcp,
    Ibm,
}

impl AnalysisService {
    /// Stage whose artifacts this service produces.
    pub fn asset_type(&self) -> AssetType {
        match self {
            Self::Gcp => AssetType::GcpAnalysis,
            Self::Ibm => AssetType::IbmAnalysis,
        }
    }
}

impl fmt::Display for AnalysisService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gcp => f.write_str("gcp"),
            Self::Ibm => f.write_str("ibm"),
        }
    }
}

impl FromStr for AnalysisService {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gcp" => Ok(Self::Gcp),
            "ibm" => Ok(Self::Ibm),
            other => Err(format!("unknown analysis service: {}", other)),
        }
    }
}

/// A named entity found in a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    /// Vendor category, e.g. `PERSON` or `Location`.
    pub kind: String,
    /// Importance within the document (GCP).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salience: Option<f64>,
    /// Relevance score (IBM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relevance: Option<f64>,
    pub mentions: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_recognition_job() {
        let json = r#"{
            "id": "4bd734c0-e575-21f3-de03-f932aa0468a0",
            "status": "processing",
            "created": "2016-08-17T19:15:17.926Z",
            "updated": "2016-08-17T19:15:20.926Z",
            "user_token": "03-01-a-title"
        }"#;
        let job: RecognitionJob = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.user_token.as_deref(), Some("03-01-a-title"));
        assert!(job.created.is_some());
        assert!(job.results.is_empty());
    }

    #[test]
    fn test_unknown_job_status() {
        let job: RecognitionJob =
            serde_json::from_str(r#"{"id": "x", "status": "paused"}"#).unwrap();
        assert_eq!(job.status, JobStatus::Unknown);
        assert_eq!(job.status.asset_status(), None);
    }

    #[test]
    fn test_running_statuses_map_to_in_process() {
        assert_eq!(
            JobStatus::Waiting.asset_status(),
            Some(AssetStatus::InProcess)
        );
        assert_eq!(
            JobStatus::Processing.asset_status(),
            Some(AssetStatus::InProcess)
        );
        assert_eq!(JobStatus::Completed.asset_status(), None);
        assert_eq!(JobStatus::Failed.asset_status(), None);
    }

    #[test]
    fn test_deserialize_results() {
        let json = r#"[{
            "results": [
                {"final": true, "alternatives": [{"transcript": "hello there ", "confidence": 0.9}]}
            ],
            "result_index": 0
        }]"#;
        let results: Vec<SpeechRecognitionResults> = serde_json::from_str(json).unwrap();
        assert_eq!(results[0].results.len(), 1);
        assert!(results[0].results[0].is_final);
        assert_eq!(
            results[0].results[0].alternatives[0].transcript,
            "hello there "
        );
    }

    #[test]
    fn test_analysis_service() {
        assert_eq!("GCP".parse::<AnalysisService>().unwrap(), AnalysisService::Gcp);
        assert_eq!(AnalysisService::Ibm.asset_type(), AssetType::IbmAnalysis);
        assert!("aws".parse::<AnalysisService>().is_err());
    }
}
