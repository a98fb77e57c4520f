//! Field extraction routes

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::ingest::IngestError;
use crate::llm::DocumentType;
use crate::pipeline::{extract_documents, load_folder, ExtractionReport};
use crate::state::AppState;

use super::multipart::read_form;
use super::MAX_BATCH_FILES;

const DEFAULT_NUM_IMAGES: usize = 10;

#[derive(Debug, Deserialize)]
pub struct ExtractQuery {
    #[serde(default)]
    pub input_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FolderRequest {
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default = "default_num_images")]
    pub num_images: usize,
    #[serde(default)]
    pub input_type: Option<String>,
}

fn default_num_images() -> usize {
    DEFAULT_NUM_IMAGES
}

fn document_type(input_type: Option<&str>) -> Result<DocumentType> {
    let input_type = input_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("input_type is required".to_string()))?;
    Ok(input_type.parse()?)
}

/// POST /extract?input_type=<type>
///
/// Runs OCR and LLM extraction over every uploaded `files` part.
pub async fn extract_upload(
    State(state): State<AppState>,
    Query(query): Query<ExtractQuery>,
    multipart: Multipart,
) -> Result<Json<ExtractionReport>> {
    let doc_type = document_type(query.input_type.as_deref())?;

    let mut form = read_form(multipart, state.config().pipeline.max_upload_bytes).await?;
    let docs = form.take_files(&["files", "file"]);
    if docs.is_empty() {
        return Err(IngestError::MissingFile.into());
    }
    if docs.len() > MAX_BATCH_FILES {
        return Err(AppError::BadRequest(format!(
            "Too many files: {} (max {})",
            docs.len(),
            MAX_BATCH_FILES
        )));
    }

    Ok(Json(extract_documents(&state, &docs, doc_type).await))
}

/// POST /extract/folder
///
/// Same pipeline over up to `num_images` stored objects under `folder_name`.
pub async fn extract_folder(
    State(state): State<AppState>,
    Json(request): Json<FolderRequest>,
) -> Result<Json<ExtractionReport>> {
    let doc_type = document_type(request.input_type.as_deref())?;
    let folder = request
        .folder_name
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("folder_name is required".to_string()))?;

    let docs = load_folder(&state, &folder, request.num_images).await?;
    tracing::info!(folder = %folder, documents = docs.len(), "Loaded folder for extraction");

    Ok(Json(extract_documents(&state, &docs, doc_type).await))
}
