//! Mock speech-to-text service.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external::{
    CreateJobRequest, JobStatus, RecognitionJob, RegisteredCallback, SpeechRecognitionResults,
    SpeechToText, VendorError,
};

/// A submitted job, without the audio payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedJobRequest {
    pub user_token: String,
    pub callback_url: Option<String>,
    pub audio_bytes: usize,
}

/// Mock implementation of [`SpeechToText`].
///
/// Created jobs start out `waiting`; tests move them along with
/// [`complete_job`](Self::complete_job) or [`add_job`](Self::add_job).
#[derive(Debug, Default)]
pub struct MockSpeechToText {
    jobs: Arc<RwLock<Vec<RecognitionJob>>>,
    requests: Arc<RwLock<Vec<RecordedJobRequest>>>,
    callbacks: Arc<RwLock<Vec<String>>>,
    next_error: Arc<RwLock<Option<VendorError>>>,
}

impl MockSpeechToText {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn recorded_requests(&self) -> Vec<RecordedJobRequest> {
        self.requests.read().await.clone()
    }

    pub async fn registered_callbacks(&self) -> Vec<String> {
        self.callbacks.read().await.clone()
    }

    /// Adds a job as if it had been created earlier.
    pub async fn add_job(&self, id: &str, status: JobStatus, user_token: &str) {
        self.jobs.write().await.push(RecognitionJob {
            id: id.to_string(),
            status,
            user_token: Some(user_token.to_string()),
            created: None,
            updated: None,
            results: Vec::new(),
        });
    }

    /// Marks the job for `user_token` completed with `results`.
    pub async fn complete_job(&self, user_token: &str, results: Vec<SpeechRecognitionResults>) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs
            .iter_mut()
            .find(|job| job.user_token.as_deref() == Some(user_token))
        {
            job.status = JobStatus::Completed;
            job.results = results;
        }
    }

    pub async fn set_next_error(&self, error: VendorError) {
        *self.next_error.write().await = Some(error);
    }

    async fn take_error(&self) -> Result<(), VendorError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn create_job(&self, request: CreateJobRequest) -> Result<RecognitionJob, VendorError> {
        self.take_error().await?;

        self.requests.write().await.push(RecordedJobRequest {
            user_token: request.user_token.clone(),
            callback_url: request.callback_url.clone(),
            audio_bytes: request.audio.len(),
        });

        let mut jobs = self.jobs.write().await;
        let job = RecognitionJob {
            id: format!("job-{}", jobs.len() + 1),
            status: JobStatus::Waiting,
            user_token: Some(request.user_token),
            created: Some(chrono::Utc::now()),
            updated: None,
            results: Vec::new(),
        };
        jobs.push(job.clone());
        Ok(job)
    }

    async fn register_callback(&self, url: &str) -> Result<RegisteredCallback, VendorError> {
        self.take_error().await?;
        self.callbacks.write().await.push(url.to_string());
        Ok(RegisteredCallback {
            status: "created".to_string(),
            url: url.to_string(),
        })
    }

    async fn list_jobs(&self) -> Result<Vec<RecognitionJob>, VendorError> {
        self.take_error().await?;
        Ok(self
            .jobs
            .read()
            .await
            .iter()
            .map(|job| RecognitionJob {
                results: Vec::new(),
                ..job.clone()
            })
            .collect())
    }

    async fn get_job(&self, id: &str) -> Result<RecognitionJob, VendorError> {
        self.take_error().await?;
        self.jobs
            .read()
            .await
            .iter()
            .find(|job| job.id == id)
            .cloned()
            .ok_or_else(|| VendorError::NotFound(format!("recognition {}", id)))
    }
}
