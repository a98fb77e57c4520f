//! Dual-engine OCR comparison
//!
//! Crops every page, runs both engines over it, uploads one annotated copy
//! per engine and page plus a CSV of all tokens.

use image::{DynamicImage, RgbImage};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::imaging::{self, BOX_THICKNESS, EASYOCR_BOX, TESSERACT_BOX};
use crate::ingest::{self, PageImage, SourceDocument};
use crate::ocr::{tokens_to_csv, EngineParams, OcrEngineKind, OcrToken, CSV_FILE_NAME};
use crate::state::AppState;
use crate::storage::object_key;

use super::publish::publish;

/// Fractions of the page height removed before OCR
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CropParams {
    #[serde(default)]
    pub upper_percent: f32,
    #[serde(default)]
    pub lower_percent: f32,
}

#[derive(Debug, Clone)]
pub struct CompareOptions {
    pub crop: CropParams,
    /// Page cap for PDF inputs
    pub max_pages: usize,
    pub params: EngineParams,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub message: String,
    pub results_csv_url: Option<String>,
    pub tesseract_image_urls: Vec<String>,
    pub easyocr_image_urls: Vec<String>,
    pub ocr_results: Vec<OcrToken>,
}

/// Run the comparison over one document
pub async fn compare_document(
    state: &AppState,
    doc: &SourceDocument,
    options: &CompareOptions,
) -> Result<CompareReport> {
    let request_id = Uuid::new_v4();
    let prefix = format!("processed_files/{}", request_id);

    let pages = ingest::expand_pages(
        doc,
        state.rasterizer(),
        state.config().pipeline.ocr_pdf_dpi,
        Some(options.max_pages),
    )
    .await?;

    tracing::info!(
        request_id = %request_id,
        document = %doc.name,
        pages = pages.len(),
        "Starting OCR comparison"
    );

    let mut report = CompareReport {
        message: "Processing complete".to_string(),
        results_csv_url: None,
        tesseract_image_urls: Vec::new(),
        easyocr_image_urls: Vec::new(),
        ocr_results: Vec::new(),
    };

    for page in pages {
        let name = page.name.clone();
        let cropped = match crop_page(page, options.crop).await {
            Ok(cropped) => cropped,
            Err(e) => {
                tracing::warn!(page = %name, error = %e, "Skipping page");
                continue;
            }
        };

        let jpeg = match encode_jpeg(cropped.clone()).await {
            Ok(jpeg) => jpeg,
            Err(e) => {
                tracing::warn!(page = %name, error = %e, "Skipping page");
                continue;
            }
        };

        for run in state.ocr().run_all(&jpeg, &options.params).await {
            let tokens = match run.result {
                Ok(tokens) => tokens,
                Err(e) => {
                    tracing::warn!(page = %name, engine = %run.engine, error = %e, "OCR engine failed");
                    continue;
                }
            };
            tracing::debug!(page = %name, engine = %run.engine, tokens = tokens.len(), "Page recognized");

            match annotate(cropped.clone(), run.engine, tokens.clone()).await {
                Ok(annotated) => {
                    let slug = run.engine.slug();
                    let file = format!("{}_{}", slug, name);
                    let key = object_key(&[&prefix, slug, &file]);
                    if let Some(stored) = publish(state.store(), &key, annotated, "image/jpeg").await {
                        match run.engine {
                            OcrEngineKind::Tesseract => report.tesseract_image_urls.push(stored.url),
                            OcrEngineKind::EasyOcr => report.easyocr_image_urls.push(stored.url),
                        }
                    }
                }
                Err(e) => tracing::warn!(page = %name, engine = %run.engine, error = %e, "Annotation failed"),
            }

            report.ocr_results.extend(tokens);
        }
    }

    let csv = tokens_to_csv(&report.ocr_results);
    let csv_key = object_key(&[&prefix, "csv_file", CSV_FILE_NAME]);
    report.results_csv_url = publish(state.store(), &csv_key, csv.into_bytes(), "text/csv")
        .await
        .map(|stored| stored.url);

    tracing::info!(
        request_id = %request_id,
        tokens = report.ocr_results.len(),
        tesseract_images = report.tesseract_image_urls.len(),
        easyocr_images = report.easyocr_image_urls.len(),
        "OCR comparison complete"
    );

    Ok(report)
}

pub(crate) async fn crop_page(page: PageImage, crop: CropParams) -> Result<RgbImage> {
    tokio::task::spawn_blocking(move || {
        imaging::crop_percent(
            &DynamicImage::ImageRgb8(page.image),
            crop.upper_percent,
            crop.lower_percent,
        )
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(|e| AppError::BadRequest(e.to_string()))
}

pub(crate) async fn encode_jpeg(image: RgbImage) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || imaging::encode_jpeg(&image))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Outline every token on a copy of the page and encode it as JPEG
async fn annotate(mut image: RgbImage, engine: OcrEngineKind, tokens: Vec<OcrToken>) -> Result<Vec<u8>> {
    let color = match engine {
        OcrEngineKind::Tesseract => TESSERACT_BOX,
        OcrEngineKind::EasyOcr => EASYOCR_BOX,
    };

    tokio::task::spawn_blocking(move || {
        for bounds in tokens.iter().filter_map(|t| t.bounds.as_ref()) {
            imaging::draw_box(&mut image, bounds, color, BOX_THICKNESS);
        }
        imaging::encode_jpeg(&image)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(|e| AppError::Internal(e.to_string()))
}
