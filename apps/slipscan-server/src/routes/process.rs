//! Dual-engine OCR comparison routes

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::ingest::{self, IngestError};
use crate::ocr::{EasyOcrParams, EngineParams, TesseractParams};
use crate::pipeline::{compare_document, CompareOptions, CompareReport, CropParams};
use crate::state::AppState;

use super::multipart::read_form;

const DEFAULT_MAX_CROPPED_IMAGES: usize = 10;

/// Processing parameters shared by both comparison routes
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessParams {
    #[serde(default)]
    pub crop_params: CropParams,
    #[serde(default = "default_max_cropped_images")]
    pub max_cropped_images: usize,
    #[serde(default)]
    pub tesseract_params: TesseractParams,
    #[serde(default)]
    pub easyocr_params: EasyOcrParams,
}

fn default_max_cropped_images() -> usize {
    DEFAULT_MAX_CROPPED_IMAGES
}

impl Default for ProcessParams {
    fn default() -> Self {
        Self {
            crop_params: CropParams::default(),
            max_cropped_images: DEFAULT_MAX_CROPPED_IMAGES,
            tesseract_params: TesseractParams::default(),
            easyocr_params: EasyOcrParams::default(),
        }
    }
}

impl From<ProcessParams> for CompareOptions {
    fn from(params: ProcessParams) -> Self {
        CompareOptions {
            crop: params.crop_params,
            max_pages: params.max_cropped_images,
            params: EngineParams {
                tesseract: params.tesseract_params,
                easyocr: params.easyocr_params,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(flatten)]
    pub params: ProcessParams,
}

/// POST /process
///
/// Downloads `file_url` and runs the comparison.
pub async fn process_url(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<CompareReport>> {
    let file_url = request
        .file_url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("file_url is required".to_string()))?;

    let doc = ingest::download(state.http(), &file_url, state.config().pipeline.max_upload_bytes).await?;
    let report = compare_document(&state, &doc, &request.params.into()).await?;
    Ok(Json(report))
}

/// POST /process/upload
///
/// Multipart `file` plus an optional `params` part holding the same JSON
/// parameters as `/process`.
pub async fn process_upload(State(state): State<AppState>, multipart: Multipart) -> Result<Json<CompareReport>> {
    let mut form = read_form(multipart, state.config().pipeline.max_upload_bytes).await?;

    let params = match form.text("params") {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str::<ProcessParams>(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid params: {}", e)))?,
        _ => ProcessParams::default(),
    };

    let doc = form
        .take_files(&["file"])
        .into_iter()
        .next()
        .ok_or(IngestError::MissingFile)?;

    let report = compare_document(&state, &doc, &params.into()).await?;
    Ok(Json(report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request: ProcessRequest = serde_json::from_str(r#"{"file_url": "http://x/slip.pdf"}"#).unwrap();
        assert_eq!(request.file_url.as_deref(), Some("http://x/slip.pdf"));
        assert_eq!(request.params.max_cropped_images, 10);
        assert_eq!(request.params.crop_params, CropParams::default());
        assert_eq!(request.params.tesseract_params.psm, 3);
        assert_eq!(request.params.tesseract_params.oem, 3);
        assert_eq!(request.params.easyocr_params.languages, vec!["en".to_string()]);
        assert!(request.params.easyocr_params.gpu);
    }

    #[test]
    fn test_request_overrides() {
        let request: ProcessRequest = serde_json::from_str(
            r#"{
                "file_url": "http://x/a.png",
                "crop_params": {"upper_percent": 0.1},
                "max_cropped_images": 2,
                "tesseract_params": {"psm": 6},
                "easyocr_params": {"languages": ["en", "hi"], "gpu": false}
            }"#,
        )
        .unwrap();

        let options: CompareOptions = request.params.into();
        assert_eq!(options.crop.upper_percent, 0.1);
        assert_eq!(options.crop.lower_percent, 0.0);
        assert_eq!(options.max_pages, 2);
        assert_eq!(options.params.tesseract.psm, 6);
        assert_eq!(options.params.tesseract.oem, 3);
        assert_eq!(options.params.easyocr.languages.len(), 2);
        assert!(!options.params.easyocr.gpu);
    }
}
