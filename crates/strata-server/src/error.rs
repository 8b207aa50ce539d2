use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use strata_pipeline::{EgressError, IngestError};
use strata_store::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Egress(#[from] EgressError),

    #[error("backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status for this error. Bad input, absent content, and backend
    /// failure each map to their own class and are never collapsed.
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Ingest(IngestError::Read(_)) => StatusCode::BAD_REQUEST,
            Self::Ingest(IngestError::Store(_)) => StatusCode::BAD_GATEWAY,
            Self::Egress(EgressError::InvalidCid { .. }) => StatusCode::BAD_REQUEST,
            Self::Egress(EgressError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Egress(_) => StatusCode::BAD_GATEWAY,
            Self::Backend(_) => StatusCode::BAD_GATEWAY,
            Self::Config(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
