//! OCR Module
//!
//! Runs one or two OCR engines over page images and reconciles their
//! outputs into a single token list.
//!
//! Supports two backends with different output schemas:
//! - Tesseract (local CLI): word-level boxes, confidence 0-100
//! - EasyOCR (reader service): line-level quads, probability 0-1
//!
//! ## Usage
//!
//! ```rust,ignore
//! use slipscan_server::ocr::{EngineParams, OcrService};
//!
//! let service = OcrService::new(&config.ocr);
//! for run in service.run_all(&page_jpeg, &EngineParams::default()).await {
//!     println!("{}: {:?}", run.engine, run.result.map(|t| t.len()));
//! }
//! ```

mod export;
mod provider;
mod service;
mod types;

pub use export::{tokens_to_csv, CSV_FILE_NAME};
pub use provider::{parse_easyocr_detections, parse_tesseract_tsv, EasyOcrEngine, OcrEngine, TesseractEngine};
pub use service::{join_text, OcrService};
pub use types::{
    BoundingBox, EasyOcrParams, EngineParams, EngineRun, OcrEngineKind, OcrError, OcrToken,
    TesseractParams,
};
