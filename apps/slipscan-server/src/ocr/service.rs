//! OCR Service
//!
//! Holds the process-wide engine instances and runs them over page images.
//! Engines are created once at startup and shared read-only across requests.

use std::sync::Arc;

use crate::config::OcrConfig;

use super::{
    provider::{EasyOcrEngine, OcrEngine, TesseractEngine},
    types::{EngineParams, EngineRun, OcrEngineKind, OcrError, OcrToken},
};

/// OCR service for processing page images
#[derive(Clone)]
pub struct OcrService {
    engines: Vec<Arc<dyn OcrEngine>>,
}

impl OcrService {
    /// Create the service with both engines, Tesseract first
    pub fn new(config: &OcrConfig) -> Self {
        Self::with_engines(vec![
            Arc::new(TesseractEngine::new(&config.tesseract_cmd, &config.default_language)),
            Arc::new(EasyOcrEngine::new(&config.easyocr_url)),
        ])
    }

    /// Create the service from explicit engines, in run order
    pub fn with_engines(engines: Vec<Arc<dyn OcrEngine>>) -> Self {
        Self { engines }
    }

    /// Engines in run order
    pub fn engines(&self) -> Vec<OcrEngineKind> {
        self.engines.iter().map(|e| e.kind()).collect()
    }

    /// Get available engines
    pub async fn available_engines(&self) -> Vec<OcrEngineKind> {
        let mut available = Vec::new();
        for engine in &self.engines {
            if engine.is_available().await {
                available.push(engine.kind());
            }
        }
        available
    }

    /// Run every engine over one image, strictly in sequence.
    ///
    /// Each engine's outcome is reported separately so a failing engine
    /// never hides the other's tokens.
    pub async fn run_all(&self, image_data: &[u8], params: &EngineParams) -> Vec<EngineRun> {
        let mut runs = Vec::with_capacity(self.engines.len());
        for engine in &self.engines {
            let result = if engine.is_available().await {
                engine.recognize(image_data, params).await
            } else {
                Err(OcrError::EngineNotAvailable(format!("{} is not available", engine.kind())))
            };
            runs.push(EngineRun {
                engine: engine.kind(),
                result,
            });
        }
        runs
    }

    /// Recognize with one engine, or the first working one.
    ///
    /// The preferred engine is tried first, then the rest in run order. If
    /// every available engine fails, the last failure is returned;
    /// `EngineNotAvailable` means no engine could be tried at all.
    pub async fn recognize(
        &self,
        image_data: &[u8],
        preferred: Option<OcrEngineKind>,
        params: &EngineParams,
    ) -> Result<Vec<OcrToken>, OcrError> {
        let ordered = self
            .engines
            .iter()
            .filter(|e| Some(e.kind()) == preferred)
            .chain(self.engines.iter().filter(|e| Some(e.kind()) != preferred));

        let mut last_error = None;
        for engine in ordered {
            if !engine.is_available().await {
                continue;
            }
            match engine.recognize(image_data, params).await {
                Ok(tokens) => return Ok(tokens),
                Err(e) => {
                    tracing::warn!(engine = %engine.kind(), error = %e, "OCR engine failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| OcrError::EngineNotAvailable("No OCR engines available".to_string())))
    }

    /// Recognize and join token texts with single spaces
    pub async fn recognize_text(
        &self,
        image_data: &[u8],
        preferred: Option<OcrEngineKind>,
        params: &EngineParams,
    ) -> Result<String, OcrError> {
        let tokens = self.recognize(image_data, preferred, params).await?;
        Ok(join_text(&tokens))
    }
}

/// Page text as the extraction prompt sees it
pub fn join_text(tokens: &[OcrToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::provider::MockEngine;

    fn engine(kind: OcrEngineKind, words: &[&str], available: bool, fail: bool) -> Arc<dyn OcrEngine> {
        Arc::new(MockEngine {
            kind,
            tokens: words.iter().map(|w| OcrToken::new(kind, *w, 90.0)).collect(),
            available,
            fail,
        })
    }

    #[tokio::test]
    async fn test_ocr_service_creation() {
        let service = OcrService::new(&OcrConfig::default());
        assert_eq!(
            service.engines(),
            vec![OcrEngineKind::Tesseract, OcrEngineKind::EasyOcr]
        );
    }

    #[tokio::test]
    async fn test_run_all_reports_each_engine() {
        let service = OcrService::with_engines(vec![
            engine(OcrEngineKind::Tesseract, &["Gross", "Salary"], true, false),
            engine(OcrEngineKind::EasyOcr, &["Gross Salary"], false, false),
        ]);

        let runs = service.run_all(b"img", &EngineParams::default()).await;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].engine, OcrEngineKind::Tesseract);
        assert_eq!(runs[0].result.as_ref().unwrap().len(), 2);
        assert!(matches!(runs[1].result, Err(OcrError::EngineNotAvailable(_))));
    }

    #[tokio::test]
    async fn test_recognize_prefers_requested_engine() {
        let service = OcrService::with_engines(vec![
            engine(OcrEngineKind::Tesseract, &["word"], true, false),
            engine(OcrEngineKind::EasyOcr, &["line of text"], true, false),
        ]);

        let text = service
            .recognize_text(b"img", Some(OcrEngineKind::EasyOcr), &EngineParams::default())
            .await
            .unwrap();
        assert_eq!(text, "line of text");
    }

    #[tokio::test]
    async fn test_recognize_falls_back_when_preferred_fails() {
        let service = OcrService::with_engines(vec![
            engine(OcrEngineKind::Tesseract, &["Net", "4200"], true, false),
            engine(OcrEngineKind::EasyOcr, &[], true, true),
        ]);

        let text = service
            .recognize_text(b"img", Some(OcrEngineKind::EasyOcr), &EngineParams::default())
            .await
            .unwrap();
        assert_eq!(text, "Net 4200");
    }

    #[tokio::test]
    async fn test_recognize_reports_engine_failure() {
        let service = OcrService::with_engines(vec![
            engine(OcrEngineKind::Tesseract, &[], true, true),
            engine(OcrEngineKind::EasyOcr, &[], true, true),
        ]);

        let result = service
            .recognize(b"img", Some(OcrEngineKind::EasyOcr), &EngineParams::default())
            .await;
        match result {
            Err(OcrError::ProcessingError(msg)) => assert_eq!(msg, "mock failure"),
            other => panic!("expected the engine's own error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_recognize_nothing_available() {
        let service = OcrService::with_engines(vec![engine(OcrEngineKind::Tesseract, &[], false, false)]);
        let result = service.recognize(b"img", None, &EngineParams::default()).await;
        assert!(matches!(result, Err(OcrError::EngineNotAvailable(_))));
    }
}
