use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use strata_pipeline::AddOutcome;

use crate::error::ServerError;
use crate::state::AppState;

/// Multipart field name carrying the uploaded file.
const UPLOAD_FIELD: &str = "upload";

/// Accept a multipart upload and return `{path, hash, size}`.
///
/// The file's bytes are streamed field-chunk by field-chunk into the
/// pipeline; the whole body is never buffered here.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AddOutcome>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or(UPLOAD_FIELD).to_string();
        let content = futures::stream::try_unfold(field, |mut field| async move {
            match field.chunk().await {
                Ok(Some(bytes)) => Ok(Some((bytes, field))),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            }
        });
        let outcome = state.pipeline.add(&name, content).await?;
        return Ok(Json(outcome));
    }
    Err(ServerError::BadRequest("no file uploaded".into()))
}

/// Stream a stored object back to the client.
///
/// The wildcard path may be a bare CID or carry a `blocks/` routing
/// segment; the pipeline strips it. Invalid and unknown identifiers fail
/// here with a status code; once the body is streaming, failures abort
/// the connection rather than corrupting the payload.
pub async fn download_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ServerError> {
    let stream = state.pipeline.cat(&path).await?;
    let headers = [(header::CONTENT_TYPE, "application/octet-stream")];
    Ok((headers, Body::from_stream(stream)).into_response())
}

/// Liveness probe.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Service identification at the root.
pub async fn info_handler() -> String {
    format!("strata gateway {}", env!("CARGO_PKG_VERSION"))
}
