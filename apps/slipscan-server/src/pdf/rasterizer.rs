//! MuPDF page rasterizer
//!
//! MuPDF documents are not thread-safe, so every call opens a fresh
//! document inside `spawn_blocking` and drops it before returning.

use async_trait::async_trait;
use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix};

use super::{PageRasterizer, PdfError};

const PDF_MIME: &str = "application/pdf";

/// Points per inch in PDF user space
const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Rasterizer backed by MuPDF
#[derive(Debug, Clone, Default)]
pub struct MupdfRasterizer;

impl MupdfRasterizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PageRasterizer for MupdfRasterizer {
    async fn page_count(&self, data: &[u8]) -> Result<usize, PdfError> {
        let data = data.to_vec();
        tokio::task::spawn_blocking(move || {
            let doc = Document::from_bytes(&data, PDF_MIME)?;
            Ok(doc.page_count()?.max(0) as usize)
        })
        .await
        .map_err(|e| PdfError::Render(format!("Task join error: {}", e)))?
    }

    async fn rasterize(
        &self,
        data: &[u8],
        dpi: u32,
        max_pages: Option<usize>,
    ) -> Result<Vec<RgbImage>, PdfError> {
        let data = data.to_vec();
        let scale = dpi.clamp(36, 600) as f32 / PDF_POINTS_PER_INCH;

        tokio::task::spawn_blocking(move || {
            let doc = Document::from_bytes(&data, PDF_MIME)?;
            let total = doc.page_count()?.max(0) as usize;
            let count = max_pages.map_or(total, |max| total.min(max));

            let matrix = Matrix::new_scale(scale, scale);
            let colorspace = Colorspace::device_rgb();

            let mut pages = Vec::with_capacity(count);
            for index in 0..count {
                let page = doc.load_page(index as i32)?;
                let pixmap = page.to_pixmap(&matrix, &colorspace, false, true)?;
                pages.push(pixmap_to_rgb(&pixmap)?);
            }
            Ok(pages)
        })
        .await
        .map_err(|e| PdfError::Render(format!("Task join error: {}", e)))?
    }
}

fn pixmap_to_rgb(pixmap: &mupdf::Pixmap) -> Result<RgbImage, PdfError> {
    samples_to_rgb(
        pixmap.width() as u32,
        pixmap.height() as u32,
        pixmap.n() as usize,
        pixmap.samples(),
    )
}

/// Bytes needed for a packed RGB page
fn rgb_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}

/// Repack `n`-component samples as RGB; grey samples are replicated
fn samples_to_rgb(width: u32, height: u32, n: usize, samples: &[u8]) -> Result<RgbImage, PdfError> {
    let mut rgb_buffer = Vec::with_capacity(rgb_len(width, height));
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(r);
            let b = samples.get(offset + 2).copied().unwrap_or(r);
            rgb_buffer.extend_from_slice(&[r, g, b]);
        }
    }

    RgbImage::from_raw(width, height, rgb_buffer)
        .ok_or_else(|| PdfError::Render("Failed to create image buffer".to_string()))
}
