//! Slipscan Server Library
//!
//! Document digitization backend: OCR over uploaded slips with two engines,
//! LLM field extraction, attribute tables and comparison charts.
//!
//! # Modules
//!
//! - `ingest`: uploads, downloads, PDF page expansion
//! - `ocr`: engines and token reconciliation
//! - `llm`: document-type prompts and the chat client
//! - `extraction`: attribute table and numeric projection
//! - `charts`: bar and pie rendering
//! - `pipeline`: per-request orchestration
//! - `routes`: HTTP surface

pub mod charts;
pub mod config;
pub mod error;
pub mod extraction;
pub mod imaging;
pub mod ingest;
pub mod llm;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod routes;
pub mod state;
pub mod storage;
