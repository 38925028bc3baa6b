use std::{io, path::PathBuf};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GenerateError>;

/// Failure of a single pipeline run
///
/// Every variant collapses to a generic client message; details stay in
/// the log.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Required request fields are missing or empty
    #[error("invalid request: {0}")]
    Validation(&'static str),

    /// The provider could not produce or deliver the image
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The image could not be written to local storage
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GenerateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message that is safe to expose to API consumers
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::Validation(message) => message,
            Self::Upstream(_) | Self::Storage(_) => "Failed to generate image",
        }
    }
}

/// Which of the two provider calls failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum UpstreamStage {
    /// `POST /images/generations`
    Generation,
    /// `GET` of the returned image locator
    Fetch,
}

/// Provider call failures, tagged with the stage they happened in
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Network or connection error
    #[error("{stage} request could not be sent: {message}")]
    Connection { stage: UpstreamStage, message: String },

    /// The call exceeded the configured timeout
    #[error("{stage} request timed out")]
    Timeout { stage: UpstreamStage },

    /// Non-success HTTP status
    #[error("{stage} request returned {status}: {message}")]
    Status {
        stage: UpstreamStage,
        status: u16,
        message: String,
    },

    /// Success status but unusable payload
    #[error("{stage} response was malformed: {message}")]
    Malformed { stage: UpstreamStage, message: String },
}

impl UpstreamError {
    pub fn stage(&self) -> UpstreamStage {
        match self {
            Self::Connection { stage, .. }
            | Self::Timeout { stage }
            | Self::Status { stage, .. }
            | Self::Malformed { stage, .. } => *stage,
        }
    }

    /// Classify a transport error from `reqwest`
    pub(crate) fn from_reqwest(stage: UpstreamStage, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout { stage }
        } else {
            Self::Connection {
                stage,
                message: error.to_string(),
            }
        }
    }
}

/// Filesystem failures while persisting an artifact
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to move artifact into place at {}: {source}", path.display())]
    Commit { path: PathBuf, source: io::Error },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
