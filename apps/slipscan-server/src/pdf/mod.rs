//! PDF rasterization
//!
//! Turns PDF bytes into one RGB image per page so the OCR engines can run
//! over multi-page documents.

mod rasterizer;

use async_trait::async_trait;
use image::RgbImage;
use thiserror::Error;

pub use rasterizer::MupdfRasterizer;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("Failed to render page: {0}")]
    Render(String),
}

impl From<mupdf::Error> for PdfError {
    fn from(err: mupdf::Error) -> Self {
        PdfError::Open(err.to_string())
    }
}

/// PDF rasterizer capability
#[async_trait]
pub trait PageRasterizer: Send + Sync {
    /// Number of pages, or an error if the bytes are not a readable PDF
    async fn page_count(&self, data: &[u8]) -> Result<usize, PdfError>;

    /// Render up to `max_pages` pages at `dpi`
    async fn rasterize(
        &self,
        data: &[u8],
        dpi: u32,
        max_pages: Option<usize>,
    ) -> Result<Vec<RgbImage>, PdfError>;
}
