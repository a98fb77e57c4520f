//! Field extraction and comparison charts
//!
//! Every page goes through crop, OCR (EasyOCR preferred), and the LLM.
//! The replies are flattened into an attribute table whose numeric
//! columns are charted and uploaded.

use serde::Serialize;
use uuid::Uuid;

use crate::charts::{self, ChartArtifact, ChartKind, ChartPoint};
use crate::error::{AppError, Result};
use crate::extraction::{
    build_table, project_table, AttributeTable, ExtractionRecords, ExtractionValue, NumericSeries,
};
use crate::ingest::{self, DocumentKind, SourceDocument};
use crate::llm::{self, DocumentType};
use crate::ocr::{EngineParams, OcrEngineKind};
use crate::state::AppState;
use crate::storage::ObjectMetadata;

use super::compare::{crop_page, encode_jpeg, CropParams};
use super::publish::publish;

#[derive(Debug, Clone, Serialize)]
pub struct ChartSummary {
    pub column: String,
    pub kind: ChartKind,
    pub url: String,
    pub values: Vec<ChartPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub extracted_data: ExtractionRecords,
    pub attribute_table: AttributeTable,
    /// Documents that produced no fields
    pub unparsed: Vec<String>,
    pub pie_chart_files: Vec<String>,
    pub bar_chart_files: Vec<String>,
    pub charts: Vec<ChartSummary>,
}

/// Extract fields from each document and chart the numeric ones
pub async fn extract_documents(
    state: &AppState,
    docs: &[SourceDocument],
    doc_type: DocumentType,
) -> ExtractionReport {
    let request_id = Uuid::new_v4().simple().to_string();
    let prefix = format!("extractions/{}", request_id);

    tracing::info!(
        request_id = %request_id,
        documents = docs.len(),
        document_type = %doc_type,
        "Starting extraction"
    );

    let mut records = ExtractionRecords::new();
    for doc in docs {
        extract_document(state, doc, doc_type, &mut records).await;
    }

    let build = build_table(&records);
    if !build.unparsed.is_empty() {
        tracing::warn!(request_id = %request_id, unparsed = ?build.unparsed, "Documents yielded no fields");
    }

    let mut report = ExtractionReport {
        extracted_data: records,
        attribute_table: build.table,
        unparsed: build.unparsed,
        pie_chart_files: Vec::new(),
        bar_chart_files: Vec::new(),
        charts: Vec::new(),
    };

    for series in project_table(&report.attribute_table) {
        for kind in [ChartKind::Bar, ChartKind::Pie] {
            let artifact = match render(series.clone(), kind).await {
                Ok(artifact) => artifact,
                Err(e) => {
                    tracing::warn!(column = %series.column, chart = ?kind, error = %e, "Chart skipped");
                    continue;
                }
            };

            let key = charts::chart_key(&prefix, kind, &artifact.column);
            let Some(stored) = publish(state.store(), &key, artifact.png, "image/png").await else {
                continue;
            };

            match kind {
                ChartKind::Bar => report.bar_chart_files.push(stored.url.clone()),
                ChartKind::Pie => report.pie_chart_files.push(stored.url.clone()),
            }
            report.charts.push(ChartSummary {
                column: artifact.column,
                kind,
                url: stored.url,
                values: artifact.points,
            });
        }
    }

    tracing::info!(
        request_id = %request_id,
        rows = report.attribute_table.len(),
        charts = report.charts.len(),
        "Extraction complete"
    );

    report
}

/// Run one document; every page becomes a record, failures included
async fn extract_document(
    state: &AppState,
    doc: &SourceDocument,
    doc_type: DocumentType,
    records: &mut ExtractionRecords,
) {
    let pipeline = &state.config().pipeline;
    let pages = match ingest::expand_pages(doc, state.rasterizer(), pipeline.extract_pdf_dpi, None).await {
        Ok(pages) => pages,
        Err(e) => {
            tracing::warn!(document = %doc.name, error = %e, "Could not read document");
            records.insert(doc.name.clone(), ExtractionValue::failed(e));
            return;
        }
    };

    let crop = CropParams {
        upper_percent: pipeline.crop_upper_percent,
        lower_percent: pipeline.crop_lower_percent,
    };

    for page in pages {
        let name = page.name.clone();
        let value = match page_text(state, page, crop).await {
            Ok(text) => match llm::extract_fields(state.llm(), doc_type, &text).await {
                Ok(reply) => ExtractionValue::Raw(reply),
                Err(e) => {
                    tracing::warn!(page = %name, error = %e, "LLM extraction failed");
                    ExtractionValue::failed(e)
                }
            },
            Err(e) => {
                tracing::warn!(page = %name, error = %e, "OCR failed");
                ExtractionValue::failed(e)
            }
        };
        records.insert(name, value);
    }
}

async fn page_text(state: &AppState, page: ingest::PageImage, crop: CropParams) -> Result<String> {
    let cropped = crop_page(page, crop).await?;
    let jpeg = encode_jpeg(cropped).await?;
    let text = state
        .ocr()
        .recognize_text(&jpeg, Some(OcrEngineKind::EasyOcr), &EngineParams::default())
        .await?;
    Ok(text)
}

async fn render(series: NumericSeries, kind: ChartKind) -> Result<ChartArtifact> {
    tokio::task::spawn_blocking(move || match kind {
        ChartKind::Bar => charts::render_bar(&series),
        ChartKind::Pie => charts::render_pie(&series),
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
    .map_err(|e| AppError::Internal(e.to_string()))
}

/// Load up to `limit` stored documents under `folder`.
///
/// Objects with unsupported extensions or that fail to download are
/// skipped with a warning.
pub async fn load_folder(state: &AppState, folder: &str, limit: usize) -> Result<Vec<SourceDocument>> {
    let objects = state.store().list(folder, limit).await?;
    let mut docs = Vec::with_capacity(objects.len());

    for ObjectMetadata { key, .. } in objects {
        let name = key.rsplit('/').next().unwrap_or(&key).to_string();
        if DocumentKind::from_name(&name).is_none() {
            tracing::debug!(key = %key, "Skipping unsupported object");
            continue;
        }

        let data = match state.store().fetch(&key).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Could not fetch stored document");
                continue;
            }
        };

        match SourceDocument::new(name, data) {
            Ok(doc) => docs.push(doc),
            Err(e) => tracing::warn!(key = %key, error = %e, "Skipping stored document"),
        }
    }

    Ok(docs)
}
