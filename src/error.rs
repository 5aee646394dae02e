use std::path::PathBuf;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Everything that can go wrong inside one request. Store-level failures are
/// normally swallowed and logged by the callers; admin mutations surface
/// these as transient notices. Nothing here kills the process.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("unrecognized date format: {0}")]
    DateFormat(String),

    #[error("failed to read {path}: {reason}")]
    JsonRead { path: PathBuf, reason: String },

    #[error("failed to write {path}: {reason}")]
    JsonWrite { path: PathBuf, reason: String },

    #[error("malformed JSON in: {0}")]
    InvalidJson(String),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("no file selected")]
    NoFileSelected,

    #[error("unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResponseError for PortalError {
    fn status_code(&self) -> StatusCode {
        match self {
            PortalError::FileNotFound(_) => StatusCode::NOT_FOUND,
            PortalError::Unauthorized => StatusCode::UNAUTHORIZED,
            PortalError::DateFormat(_)
            | PortalError::InvalidJson(_)
            | PortalError::InvalidFilename(_)
            | PortalError::NoFileSelected => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.to_string(),
        }))
    }
}
