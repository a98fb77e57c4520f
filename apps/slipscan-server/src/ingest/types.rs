//! Intake types

use image::RgbImage;
use thiserror::Error;

use crate::pdf::PdfError;

/// Accepted upload extensions
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "pdf"];

/// Kind of an uploaded document, by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Image,
    Pdf,
}

impl DocumentKind {
    /// Classify a file name; `None` if the extension is not accepted
    pub fn from_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return None;
        }
        Some(if ext == "pdf" { Self::Pdf } else { Self::Image })
    }
}

/// One uploaded or downloaded input
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub kind: DocumentKind,
    pub data: Vec<u8>,
}

impl SourceDocument {
    /// Build from a client-supplied name, rejecting unknown extensions
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Result<Self, IngestError> {
        let name = secure_filename(&name.into());
        if name.is_empty() {
            return Err(IngestError::EmptyFileName);
        }
        let kind =
            DocumentKind::from_name(&name).ok_or_else(|| IngestError::UnsupportedFileType(name.clone()))?;
        Ok(Self { name, kind, data })
    }
}

/// One page ready for OCR
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Document identifier used as the table row key
    pub name: String,
    pub image: RgbImage,
}

/// Reduce a client-supplied file name to a safe single path segment.
///
/// Directory components are dropped, whitespace becomes `_`, and anything
/// outside `[A-Za-z0-9._-]` is removed. Leading dots are stripped.
pub fn secure_filename(name: &str) -> String {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or("");
    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    cleaned.trim_start_matches(&['.', '_'][..]).to_string()
}

/// Input intake errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("No file part")]
    MissingFile,

    #[error("No selected file")]
    EmptyFileName,

    #[error("Invalid file type: {0}")]
    UnsupportedFileType(String),

    #[error("File too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid image file: {0}")]
    InvalidImage(String),

    #[error("Invalid PDF file: {0}")]
    InvalidPdf(#[from] PdfError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl IngestError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Download(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing_file",
            Self::EmptyFileName => "empty_file_name",
            Self::UnsupportedFileType(_) => "invalid_file_type",
            Self::TooLarge { .. } => "file_too_large",
            Self::Download(_) => "download_failed",
            Self::InvalidImage(_) => "invalid_image",
            Self::InvalidPdf(_) => "invalid_pdf",
            Self::InvalidRequest(_) => "bad_request",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_kind_from_name() {
        assert_eq!(DocumentKind::from_name("slip.PNG"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_name("scan.jpeg"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_name("march.pdf"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_name("notes.txt"), None);
        assert_eq!(DocumentKind::from_name("no_extension"), None);
    }

    #[test]
    fn test_secure_filename() {
        assert_eq!(secure_filename("../../etc/passwd"), "passwd");
        assert_eq!(secure_filename("C:\\Users\\me\\My Slip.png"), "My_Slip.png");
        assert_eq!(secure_filename("salary (march).jpg"), "salary_march.jpg");
        assert_eq!(secure_filename(".hidden.png"), "hidden.png");
        assert_eq!(secure_filename("   "), "");
    }

    #[test]
    fn test_source_document_validation() {
        assert!(matches!(
            SourceDocument::new("", vec![]),
            Err(IngestError::EmptyFileName)
        ));
        assert!(matches!(
            SourceDocument::new("report.docx", vec![1]),
            Err(IngestError::UnsupportedFileType(_))
        ));
        let doc = SourceDocument::new("uploads/slip 1.pdf", vec![1]).unwrap();
        assert_eq!(doc.name, "slip_1.pdf");
        assert_eq!(doc.kind, DocumentKind::Pdf);
    }
}
