//! Single document upload

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;

use crate::error::Result;
use crate::ingest::{self, IngestError};
use crate::state::AppState;
use crate::storage::{content_type_for, object_key};

use super::multipart::read_form;

/// Storage folder for raw uploads
pub const UPLOAD_FOLDER: &str = "uploaded_files";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_url: String,
}

/// POST /api/upload
///
/// Validates the `file` part and stores it under `uploaded_files/`.
pub async fn upload_file(State(state): State<AppState>, multipart: Multipart) -> Result<Json<UploadResponse>> {
    let mut form = read_form(multipart, state.config().pipeline.max_upload_bytes).await?;
    let doc = form
        .take_files(&["file"])
        .into_iter()
        .next()
        .ok_or(IngestError::MissingFile)?;

    ingest::validate(&doc, state.rasterizer()).await?;

    let key = object_key(&[UPLOAD_FOLDER, &doc.name]);
    let size = doc.data.len();
    let stored = state
        .store()
        .store(&key, doc.data, &content_type_for(&doc.name))
        .await?;

    tracing::info!(file_name = %doc.name, size, key = %stored.key, "File uploaded");

    Ok(Json(UploadResponse {
        message: format!("File {} uploaded successfully!", doc.name),
        file_url: stored.url,
    }))
}
