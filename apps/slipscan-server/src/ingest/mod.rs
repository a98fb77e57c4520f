//! Document intake
//!
//! Validates uploads, downloads remote files, and expands every input
//! (single image or multi-page PDF) into page images.

mod types;

pub use types::*;

use crate::imaging;
use crate::pdf::PageRasterizer;

/// Check that the bytes really are what the extension claims
pub async fn validate(doc: &SourceDocument, rasterizer: &dyn PageRasterizer) -> Result<(), IngestError> {
    match doc.kind {
        DocumentKind::Image => {
            imaging::decode(&doc.data).map_err(|e| IngestError::InvalidImage(e.to_string()))?;
        }
        DocumentKind::Pdf => {
            let pages = rasterizer.page_count(&doc.data).await?;
            if pages == 0 {
                return Err(IngestError::InvalidRequest(format!("{} has no pages", doc.name)));
            }
        }
    }
    Ok(())
}

/// Reject payloads above the configured limit
pub fn check_size(size: usize, max: usize) -> Result<(), IngestError> {
    if size > max {
        return Err(IngestError::TooLarge { size, max });
    }
    Ok(())
}

/// Download a remote file; the last URL path segment becomes its name
pub async fn download(
    client: &reqwest::Client,
    url: &str,
    max_bytes: usize,
) -> Result<SourceDocument, IngestError> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|e| IngestError::InvalidRequest(format!("Invalid file_url {}: {}", url, e)))?;

    let name = parsed
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .map(|segment| {
            urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string())
        })
        .unwrap_or_default();

    let response = client
        .get(parsed)
        .send()
        .await
        .map_err(|e| IngestError::Download(format!("{}: {}", url, e)))?;

    if !response.status().is_success() {
        return Err(IngestError::Download(format!("{} returned {}", url, response.status())));
    }

    let data = response
        .bytes()
        .await
        .map_err(|e| IngestError::Download(format!("Failed to read body of {}: {}", url, e)))?;
    check_size(data.len(), max_bytes)?;

    tracing::debug!(url = %url, name = %name, size = data.len(), "Downloaded document");
    SourceDocument::new(name, data.to_vec())
}

/// Expand a document into page images.
///
/// Images become a single page keeping the document name. PDF pages are
/// named `<pdf name>_page_<n>.jpg` (1-indexed) and capped at `max_pages`.
pub async fn expand_pages(
    doc: &SourceDocument,
    rasterizer: &dyn PageRasterizer,
    dpi: u32,
    max_pages: Option<usize>,
) -> Result<Vec<PageImage>, IngestError> {
    match doc.kind {
        DocumentKind::Image => {
            let data = doc.data.clone();
            let image = tokio::task::spawn_blocking(move || imaging::decode(&data))
                .await
                .map_err(|e| IngestError::InvalidImage(format!("Task join error: {}", e)))?
                .map_err(|e| IngestError::InvalidImage(e.to_string()))?;

            Ok(vec![PageImage {
                name: doc.name.clone(),
                image: image.to_rgb8(),
            }])
        }
        DocumentKind::Pdf => {
            let pages = rasterizer.rasterize(&doc.data, dpi, max_pages).await?;
            tracing::debug!(document = %doc.name, pages = pages.len(), dpi, "Rasterized PDF");

            Ok(pages
                .into_iter()
                .enumerate()
                .map(|(i, image)| PageImage {
                    name: page_name(&doc.name, i + 1),
                    image,
                })
                .collect())
        }
    }
}

/// Identifier of the `number`-th page (1-indexed) of a PDF
pub fn page_name(pdf_name: &str, number: usize) -> String {
    format!("{}_page_{}.jpg", pdf_name, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::PdfError;
    use async_trait::async_trait;
    use image::{Rgb, RgbImage};

    struct FakeRasterizer {
        pages: usize,
    }

    #[async_trait]
    impl PageRasterizer for FakeRasterizer {
        async fn page_count(&self, _data: &[u8]) -> Result<usize, PdfError> {
            Ok(self.pages)
        }

        async fn rasterize(
            &self,
            _data: &[u8],
            _dpi: u32,
            max_pages: Option<usize>,
        ) -> Result<Vec<RgbImage>, PdfError> {
            let count = max_pages.map_or(self.pages, |m| m.min(self.pages));
            Ok((0..count).map(|_| RgbImage::from_pixel(8, 8, Rgb([255, 255, 255]))).collect())
        }
    }

    fn png_bytes() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(RgbImage::from_pixel(4, 4, Rgb([0, 0, 0])));
        imaging::encode_png(&img).unwrap()
    }

    #[tokio::test]
    async fn test_image_is_single_page() {
        let doc = SourceDocument::new("slip.png", png_bytes()).unwrap();
        let pages = expand_pages(&doc, &FakeRasterizer { pages: 0 }, 72, None)
            .await
            .unwrap();
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].name, "slip.png");
    }

    #[tokio::test]
    async fn test_pdf_pages_are_named_and_capped() {
        let doc = SourceDocument::new("march.pdf", b"%PDF-1.4".to_vec()).unwrap();
        let pages = expand_pages(&doc, &FakeRasterizer { pages: 5 }, 300, Some(3))
            .await
            .unwrap();
        let names: Vec<_> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["march.pdf_page_1.jpg", "march.pdf_page_2.jpg", "march.pdf_page_3.jpg"]
        );
    }

    #[tokio::test]
    async fn test_validate_rejects_corrupt_image() {
        let doc = SourceDocument::new("slip.jpg", b"not an image".to_vec()).unwrap();
        let result = validate(&doc, &FakeRasterizer { pages: 1 }).await;
        assert!(matches!(result, Err(IngestError::InvalidImage(_))));
    }

    #[tokio::test]
    async fn test_validate_rejects_empty_pdf() {
        let doc = SourceDocument::new("empty.pdf", b"%PDF".to_vec()).unwrap();
        assert!(validate(&doc, &FakeRasterizer { pages: 0 }).await.is_err());
        assert!(validate(&doc, &FakeRasterizer { pages: 2 }).await.is_ok());
    }

    #[test]
    fn test_check_size() {
        assert!(check_size(10, 10).is_ok());
        assert!(matches!(check_size(11, 10), Err(IngestError::TooLarge { size: 11, max: 10 })));
    }
}
