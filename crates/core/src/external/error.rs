//! Error types for external collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from running an external command line tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The binary could not be found.
    #[error("Executable not found: {path}, it may not be installed")]
    NotFound { path: PathBuf },

    /// The tool ran but exited unsuccessfully.
    #[error("{tool} failed with exit code {code:?}")]
    Failed {
        tool: String,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// I/O error while spawning or waiting for the tool.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Captured standard error of a failed run, if any.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr, .. } => stderr.as_deref(),
            _ => None,
        }
    }
}

/// Errors from the speech-to-text and language analysis services.
#[derive(Debug, Error)]
pub enum VendorError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl VendorError {
    /// Maps a non-success response to the matching error variant.
    pub(crate) async fn check_response(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, VendorError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == 401 || status == 403 {
            return Err(VendorError::NotConfigured(format!(
                "{} rejected the credentials",
                what
            )));
        }
        if status == 404 {
            return Err(VendorError::NotFound(what.to_string()));
        }
        if status == 429 {
            return Err(VendorError::RateLimitExceeded);
        }
        let body = response.text().await.unwrap_or_default();
        Err(VendorError::ApiError {
            status: status.as_u16(),
            message: body,
        })
    }
}
