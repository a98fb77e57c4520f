//! Request orchestration
//!
//! Each request is one linear pass: intake, OCR, optional LLM, tables and
//! charts, uploads. Per-page and per-artifact failures are logged and
//! degrade the result; only failures on the sole input abort the request.

mod compare;
mod extract;
mod publish;

pub use compare::{compare_document, CompareOptions, CompareReport, CropParams};
pub use extract::{extract_documents, load_folder, ChartSummary, ExtractionReport};
pub use publish::publish;
