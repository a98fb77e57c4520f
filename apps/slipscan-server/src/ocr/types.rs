//! OCR Types
//!
//! Defines the token model shared by all engines and the per-request
//! engine parameters.

use serde::{Deserialize, Serialize};

/// OCR engine tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OcrEngineKind {
    /// Word-level boxes with 0-100 confidence
    #[serde(rename = "Tesseract")]
    Tesseract,
    /// Line-level boxes with 0-1 probability
    #[serde(rename = "EasyOCR")]
    EasyOcr,
}

impl OcrEngineKind {
    /// Label used in CSV exports and responses
    pub fn label(&self) -> &'static str {
        match self {
            Self::Tesseract => "Tesseract",
            Self::EasyOcr => "EasyOCR",
        }
    }

    /// Folder / file prefix for artifacts produced by this engine
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Tesseract => "tesseract",
            Self::EasyOcr => "easyocr",
        }
    }
}

impl std::fmt::Display for OcrEngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Pixel-based rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Axis-aligned box around a set of (possibly rotated) corner points
    pub fn enclosing(points: &[[f64; 2]]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
        let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
        for [x, y] in points {
            min_x = min_x.min(*x);
            min_y = min_y.min(*y);
            max_x = max_x.max(*x);
            max_y = max_y.max(*y);
        }

        let x = min_x.max(0.0);
        let y = min_y.max(0.0);
        Some(Self {
            x: x as u32,
            y: y as u32,
            width: (max_x - x).max(0.0) as u32,
            height: (max_y - y).max(0.0) as u32,
        })
    }
}

/// One recognized text fragment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrToken {
    #[serde(rename = "Recognized Text")]
    pub text: String,
    /// Confidence on a 0-100 scale regardless of engine
    #[serde(rename = "Confidence Score")]
    pub confidence: f64,
    #[serde(rename = "OCR Model")]
    pub engine: OcrEngineKind,
    /// Only used for annotation; never serialized
    #[serde(skip)]
    pub bounds: Option<BoundingBox>,
}

impl OcrToken {
    pub fn new(engine: OcrEngineKind, text: impl Into<String>, confidence: f64) -> Self {
        Self {
            text: text.into(),
            confidence: confidence.clamp(0.0, 100.0),
            engine,
            bounds: None,
        }
    }

    pub fn with_bounds(mut self, bounds: BoundingBox) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Tesseract CLI parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TesseractParams {
    /// Page segmentation mode
    #[serde(default = "default_mode")]
    pub psm: u8,
    /// OCR engine mode
    #[serde(default = "default_mode")]
    pub oem: u8,
    /// Tesseract language code, e.g. `eng`
    #[serde(default)]
    pub lang: Option<String>,
}

fn default_mode() -> u8 {
    3
}

impl Default for TesseractParams {
    fn default() -> Self {
        Self {
            psm: 3,
            oem: 3,
            lang: None,
        }
    }
}

/// EasyOCR reader parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EasyOcrParams {
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_gpu")]
    pub gpu: bool,
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_gpu() -> bool {
    true
}

impl Default for EasyOcrParams {
    fn default() -> Self {
        Self {
            languages: default_languages(),
            gpu: true,
        }
    }
}

/// Parameters for every engine, as sent by the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineParams {
    #[serde(default)]
    pub tesseract: TesseractParams,
    #[serde(default)]
    pub easyocr: EasyOcrParams,
}

/// Outcome of running one engine over one page
#[derive(Debug)]
pub struct EngineRun {
    pub engine: OcrEngineKind,
    pub result: Result<Vec<OcrToken>, OcrError>,
}

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("OCR engine not available: {0}")]
    EngineNotAvailable(String),

    #[error("OCR processing failed: {0}")]
    ProcessingError(String),

    #[error("Unexpected engine output: {0}")]
    InvalidOutput(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl OcrError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::EngineNotAvailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ApiError(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_serialization_uses_column_names() {
        let token = OcrToken::new(OcrEngineKind::EasyOcr, "TOTAL", 87.5)
            .with_bounds(BoundingBox { x: 1, y: 2, width: 3, height: 4 });
        let json = serde_json::to_value(&token).unwrap();

        assert_eq!(json["Recognized Text"], "TOTAL");
        assert_eq!(json["Confidence Score"], 87.5);
        assert_eq!(json["OCR Model"], "EasyOCR");
        assert!(json.get("bounds").is_none());
    }

    #[test]
    fn test_confidence_clamped() {
        assert_eq!(OcrToken::new(OcrEngineKind::Tesseract, "x", -1.0).confidence, 0.0);
        assert_eq!(OcrToken::new(OcrEngineKind::Tesseract, "x", 140.0).confidence, 100.0);
    }

    #[test]
    fn test_enclosing_box_from_quad() {
        let quad = [[10.0, 5.0], [60.0, 5.0], [60.0, 25.0], [10.0, 25.0]];
        let bounds = BoundingBox::enclosing(&quad).unwrap();
        assert_eq!(bounds, BoundingBox { x: 10, y: 5, width: 50, height: 20 });
        assert!(BoundingBox::enclosing(&[]).is_none());
    }

    #[test]
    fn test_engine_params_defaults_from_empty_json() {
        let params: EngineParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.tesseract.psm, 3);
        assert_eq!(params.tesseract.oem, 3);
        assert_eq!(params.easyocr.languages, vec!["en".to_string()]);
        assert!(params.easyocr.gpu);
    }
}
