//! Error taxonomy shared by the state store, media intake, and API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::types::TeamId;

/// Result type for quiz operations
pub type QuizResult<T> = Result<T, QuizError>;

/// Errors that can occur while mutating, persisting, or serving quiz state
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("unknown team {0}")]
    UnknownTeam(TeamId),

    #[error("round numbers start at 1")]
    InvalidRound,

    #[error("unsupported track extension {0:?} (expected mp3 or wav)")]
    UnsupportedExtension(String),

    #[error("upload has no usable filename")]
    EmptyFilename,

    #[error("snapshot rejected: {0}")]
    BadSnapshot(String),

    #[error("malformed upload: {0}")]
    Upload(String),

    #[error("snapshot encoding failed: {0}")]
    SnapshotEncoding(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// JSON body carried by every error response
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl QuizError {
    fn status(&self) -> StatusCode {
        match self {
            QuizError::UnknownTeam(_) => StatusCode::NOT_FOUND,
            QuizError::InvalidRound
            | QuizError::UnsupportedExtension(_)
            | QuizError::EmptyFilename
            | QuizError::BadSnapshot(_)
            | QuizError::Upload(_) => StatusCode::BAD_REQUEST,
            QuizError::SnapshotEncoding(_) | QuizError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for QuizError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
