//! API request handlers.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{Multipart, State},
};

use crate::NotesmithError;
use crate::core::kind::DocumentKind;
use crate::core::scratch::ScratchArena;
use crate::types::preview;

use super::{
    error::ApiError,
    types::{ApiState, HealthResponse, NotesResponse, ReadResponse},
};

/// Multipart field carrying the uploaded document.
const FILE_FIELD: &str = "file";

/// Landing page handler.
///
/// GET /
pub async fn index_handler() -> &'static str {
    "Welcome to Notes Summarizer!"
}

/// Health check endpoint handler.
///
/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Text extraction endpoint handler.
///
/// POST /read
///
/// Accepts multipart form data with a `file` field (PDF, PNG, JPG/JPEG or BMP,
/// chosen by the file name's extension) and returns `{"text": ...}`.
///
/// Returns 400 when no file is sent or its extension is not supported.
pub async fn read_handler(State(state): State<ApiState>, multipart: Multipart) -> Result<Json<ReadResponse>, ApiError> {
    tracing::info!("Received /read request");
    let text = extract_upload(&state, multipart).await?;
    Ok(Json(ReadResponse { text }))
}

/// Notes generation endpoint handler.
///
/// POST /generate_notes
///
/// Same input as `/read`. The extracted text is sent to the notes service and
/// the result returned as `{"notes": ...}`. A notes service failure is a 500.
pub async fn generate_notes_handler(
    State(state): State<ApiState>,
    multipart: Multipart,
) -> Result<Json<NotesResponse>, ApiError> {
    tracing::info!("Received /generate_notes request");
    let text = extract_upload(&state, multipart).await?;

    let notes = state
        .notes
        .generate_notes(&text)
        .await
        .map_err(ApiError::notes_failed)?;

    Ok(Json(NotesResponse { notes }))
}

/// Find the `file` field, check its extension, then extract its text.
///
/// The extension is checked before the upload body is read, so unsupported
/// uploads never reach disk.
async fn extract_upload(state: &ApiState, mut multipart: Multipart) -> Result<String, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(NotesmithError::validation(e.to_string())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let kind = DocumentKind::from_hint(&file_name).map_err(|_| {
            tracing::error!("Unsupported file format: {}", file_name);
            ApiError::unsupported_format()
        })?;

        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::validation(NotesmithError::validation(e.to_string())))?;

        tracing::info!("Received {} ({} bytes) as {}", file_name, data.len(), kind);
        return run_extraction(state, data.to_vec(), kind).await;
    }

    tracing::error!("No file provided");
    Err(ApiError::no_file())
}

/// Persist the upload in a request-scoped scratch directory and run the pipeline on the blocking pool.
///
/// The scratch directory, and with it the upload, is removed once extraction returns.
/// With `server.extraction_timeout_secs` set, the request gives up after that long;
/// the extraction itself runs to completion in the background and cleans up after itself.
async fn run_extraction(state: &ApiState, data: Vec<u8>, kind: DocumentKind) -> Result<String, ApiError> {
    let pipeline = Arc::clone(&state.pipeline);
    let scratch_dir = state.config.extraction.scratch_dir.clone();

    let task = tokio::task::spawn_blocking(move || -> crate::Result<String> {
        let arena = ScratchArena::new(scratch_dir.as_deref())?;
        let upload_path = arena.upload_path(kind.extension());
        tracing::info!("Saving file to: {}", upload_path.display());
        std::fs::write(&upload_path, &data)?;

        let text = pipeline.run_kind(&upload_path, kind);
        tracing::debug!("Extracted {} chars: {}...", text.len(), preview(&text, 50));
        Ok(text)
    });

    let joined = match state.config.server.extraction_timeout_secs {
        Some(seconds) => tokio::time::timeout(Duration::from_secs(seconds), task)
            .await
            .map_err(|_| ApiError::timeout(seconds))?,
        None => task.await,
    };

    joined
        .map_err(|e| ApiError::internal(NotesmithError::Other(format!("Extraction task failed: {}", e))))?
        .map_err(ApiError::internal)
}
