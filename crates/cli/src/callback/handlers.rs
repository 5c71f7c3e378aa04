use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

use casebook_core::external::{RecognitionCallback, EVENT_COMPLETED_WITH_RESULTS};
use casebook_core::stages::Recognition;

use super::state::CallbackState;

#[derive(Debug, Deserialize)]
pub struct ChallengeQuery {
    pub challenge_string: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize)]
pub struct StoredResponse {
    pub episode: String,
    pub file: String,
}

fn error(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

fn echo(challenge: String) -> Response {
    ([(header::CONTENT_TYPE, "text/plain")], challenge).into_response()
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Callback URL verification: echo the challenge back verbatim.
pub async fn challenge(Query(query): Query<ChallengeQuery>) -> Response {
    match query.challenge_string {
        Some(challenge) => echo(challenge),
        None => error(StatusCode::BAD_REQUEST, "missing challenge_string"),
    }
}

/// Stores the results of a finished job as the episode's recognition.
pub async fn receive(
    State(state): State<Arc<CallbackState>>,
    Query(query): Query<ChallengeQuery>,
    body: Bytes,
) -> Response {
    if let Some(challenge) = query.challenge_string {
        return echo(challenge);
    }

    let callback: RecognitionCallback = match serde_json::from_slice(&body) {
        Ok(callback) => callback,
        Err(e) => {
            warn!(error = %e, "Malformed callback body");
            return error(StatusCode::BAD_REQUEST, format!("invalid body: {}", e));
        }
    };

    if callback.event != EVENT_COMPLETED_WITH_RESULTS {
        info!(job_id = %callback.id, event = %callback.event, "Ignoring callback event");
        return StatusCode::OK.into_response();
    }

    let Some(token) = callback.user_token.as_deref() else {
        warn!(job_id = %callback.id, "Callback without user token");
        return error(StatusCode::UNPROCESSABLE_ENTITY, "missing user_token");
    };

    let episode = match state.catalog().episode_from_name(token) {
        Ok(episode) => episode,
        Err(e) => {
            warn!(job_id = %callback.id, token, error = %e, "Callback token is not an episode name");
            return error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string());
        }
    };

    match Recognition::new(&episode).write_results(&callback.results).await {
        Ok(path) => {
            info!(job_id = %callback.id, episode = %token, "Stored recognition from callback");
            (
                StatusCode::OK,
                Json(StoredResponse {
                    episode: episode.name(),
                    file: path.display().to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            warn!(job_id = %callback.id, error = %e, "Failed to store recognition");
            error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}
