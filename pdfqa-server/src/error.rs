//! Translation of service failures into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pdfqa_model::ModelError;
use pdfqa_rag::RagError;
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::json::PrettyJson;

/// How a failure is reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request itself is unusable (400).
    Validation,
    /// A downstream component failed (500).
    Internal,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Rag(#[from] RagError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ApiError {
    pub fn missing_property(name: &str) -> Self {
        Self::Validation(format!("Missing property: {name}"))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Rag(_) | Self::Model(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self.kind() {
            ErrorKind::Validation => warn!(%status, error = %self, "rejected request"),
            ErrorKind::Internal => error!(%status, error = %self, "request failed"),
        }
        (status, PrettyJson(json!({ "error": self.to_string() }))).into_response()
    }
}
