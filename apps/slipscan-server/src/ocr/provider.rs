//! OCR Engines
//!
//! Defines the engine trait and the two backends whose outputs the
//! service reconciles into [`OcrToken`]s:
//!
//! - [`TesseractEngine`]: local CLI, word-level TSV with 0-100 confidence
//! - [`EasyOcrEngine`]: reader service over HTTP, line-level quads with 0-1 probability

use std::path::PathBuf;
use std::process::Command;

use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::types::{BoundingBox, EngineParams, OcrEngineKind, OcrError, OcrToken};

/// OCR engine trait
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Get the engine tag
    fn kind(&self) -> OcrEngineKind;

    /// Check if the engine is available
    async fn is_available(&self) -> bool;

    /// Recognize text in an encoded image (PNG or JPEG)
    async fn recognize(&self, image_data: &[u8], params: &EngineParams) -> Result<Vec<OcrToken>, OcrError>;
}

// ============================================================================
// Tesseract
// ============================================================================

/// Tesseract OCR engine (local CLI)
pub struct TesseractEngine {
    command: String,
    default_language: String,
}

impl TesseractEngine {
    pub fn new(command: &str, default_language: &str) -> Self {
        Self {
            command: command.to_string(),
            default_language: default_language.to_string(),
        }
    }
}

#[async_trait]
impl OcrEngine for TesseractEngine {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::Tesseract
    }

    async fn is_available(&self) -> bool {
        let command = self.command.clone();
        tokio::task::spawn_blocking(move || Command::new(command).arg("--version").output().is_ok())
            .await
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8], params: &EngineParams) -> Result<Vec<OcrToken>, OcrError> {
        let command = self.command.clone();
        let lang = params
            .tesseract
            .lang
            .clone()
            .unwrap_or_else(|| self.default_language.clone());
        let psm = params.tesseract.psm;
        let oem = params.tesseract.oem;

        let input_path = std::env::temp_dir().join(format!("ocr_input_{}.png", uuid::Uuid::new_v4()));
        std::fs::write(&input_path, image_data)
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let run_path = input_path.clone();
        let output = tokio::task::spawn_blocking(move || {
            Command::new(command)
                .arg(&run_path)
                .arg("stdout")
                .args(["--psm", &psm.to_string()])
                .args(["--oem", &oem.to_string()])
                .args(["-l", &lang])
                .arg("tsv")
                .output()
        })
        .await
        .map_err(|e| OcrError::ProcessingError(format!("Task join error: {}", e)));

        remove_temp(input_path);

        let output = output?.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                OcrError::EngineNotAvailable("tesseract not found (install tesseract-ocr)".to_string())
            } else {
                OcrError::ProcessingError(format!("Failed to run tesseract: {}", e))
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!("Tesseract failed: {}", stderr)));
        }

        parse_tesseract_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

fn remove_temp(path: PathBuf) {
    if let Err(e) = std::fs::remove_file(&path) {
        tracing::debug!("Could not remove {}: {}", path.display(), e);
    }
}

/// Parse `tesseract ... tsv` output into word tokens.
///
/// Rows without text (page, block, paragraph and line rows) are dropped.
pub fn parse_tesseract_tsv(tsv: &str) -> Result<Vec<OcrToken>, OcrError> {
    let mut lines = tsv.lines();
    let header = lines
        .next()
        .ok_or_else(|| OcrError::InvalidOutput("empty TSV output".to_string()))?;

    let columns: Vec<&str> = header.split('\t').collect();
    let index_of = |name: &str| {
        columns
            .iter()
            .position(|c| c.trim() == name)
            .ok_or_else(|| OcrError::InvalidOutput(format!("TSV header missing `{}`", name)))
    };
    let (left, top, width, height) = (
        index_of("left")?,
        index_of("top")?,
        index_of("width")?,
        index_of("height")?,
    );
    let (conf, text) = (index_of("conf")?, index_of("text")?);

    let mut tokens = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split('\t').collect();
        let word = fields.get(text).map(|t| t.trim()).unwrap_or("");
        if word.is_empty() {
            continue;
        }

        let number = |i: usize| fields.get(i).and_then(|v| v.trim().parse::<f64>().ok());
        let confidence = number(conf).unwrap_or(0.0);
        let mut token = OcrToken::new(OcrEngineKind::Tesseract, word, confidence);

        if let (Some(x), Some(y), Some(w), Some(h)) = (number(left), number(top), number(width), number(height)) {
            token = token.with_bounds(BoundingBox {
                x: x.max(0.0) as u32,
                y: y.max(0.0) as u32,
                width: w.max(0.0) as u32,
                height: h.max(0.0) as u32,
            });
        }
        tokens.push(token);
    }

    Ok(tokens)
}

// ============================================================================
// EasyOCR
// ============================================================================

/// One `readtext` detection: corner points, text, probability
#[derive(Debug, Deserialize)]
struct Detection(Vec<[f64; 2]>, String, f64);

/// EasyOCR reader service engine
pub struct EasyOcrEngine {
    base_url: String,
    client: reqwest::Client,
    /// Set once the reader service has answered a health check
    ready: OnceCell<()>,
}

impl EasyOcrEngine {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            ready: OnceCell::new(),
        }
    }
}

#[async_trait]
impl OcrEngine for EasyOcrEngine {
    fn kind(&self) -> OcrEngineKind {
        OcrEngineKind::EasyOcr
    }

    async fn is_available(&self) -> bool {
        if self.ready.initialized() {
            return true;
        }

        let url = format!("{}/health", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let _ = self.ready.set(());
                true
            }
            _ => false,
        }
    }

    async fn recognize(&self, image_data: &[u8], params: &EngineParams) -> Result<Vec<OcrToken>, OcrError> {
        let url = format!("{}/readtext", self.base_url);
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image_data);

        let request = serde_json::json!({
            "image": image_base64,
            "languages": params.easyocr.languages,
            "gpu": params.easyocr.gpu,
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call EasyOCR: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!("EasyOCR returned {}: {}", status, body)));
        }

        let body = response
            .text()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to read response: {}", e)))?;

        parse_easyocr_detections(&body)
    }
}

/// Parse a `readtext` response (`[[corners, text, probability], ...]`)
pub fn parse_easyocr_detections(body: &str) -> Result<Vec<OcrToken>, OcrError> {
    let detections: Vec<Detection> = serde_json::from_str(body)
        .map_err(|e| OcrError::InvalidOutput(format!("Failed to parse detections: {}", e)))?;

    Ok(detections
        .into_iter()
        .map(|Detection(corners, text, probability)| {
            let token = OcrToken::new(OcrEngineKind::EasyOcr, text.trim(), probability * 100.0);
            match BoundingBox::enclosing(&corners) {
                Some(bounds) => token.with_bounds(bounds),
                None => token,
            }
        })
        .collect())
}

/// Mock engine for testing
#[cfg(test)]
pub struct MockEngine {
    pub kind: OcrEngineKind,
    pub tokens: Vec<OcrToken>,
    pub available: bool,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl OcrEngine for MockEngine {
    fn kind(&self) -> OcrEngineKind {
        self.kind
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_data: &[u8], _params: &EngineParams) -> Result<Vec<OcrToken>, OcrError> {
        if self.fail {
            return Err(OcrError::ProcessingError("mock failure".to_string()));
        }
        Ok(self.tokens.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TSV: &str = "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n\
1\t1\t0\t0\t0\t0\t0\t0\t800\t600\t-1\t\n\
4\t1\t1\t1\t1\t0\t20\t30\t300\t25\t-1\t\n\
5\t1\t1\t1\t1\t1\t20\t30\t90\t25\t96.12\tGross\n\
5\t1\t1\t1\t1\t2\t115\t30\t80\t25\t91\tSalary:\n\
5\t1\t1\t1\t1\t3\t200\t30\t60\t25\t88.5\t5000\n\
5\t1\t1\t1\t1\t4\t270\t30\t10\t25\t12\t \n";

    #[test]
    fn test_parse_tsv_keeps_only_words() {
        let tokens = parse_tesseract_tsv(TSV).unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["Gross", "Salary:", "5000"]);
        assert!(tokens.iter().all(|t| t.engine == OcrEngineKind::Tesseract));
        assert_eq!(tokens[0].confidence, 96.12);
        assert_eq!(
            tokens[2].bounds,
            Some(BoundingBox { x: 200, y: 30, width: 60, height: 25 })
        );
    }

    #[test]
    fn test_parse_tsv_rejects_missing_columns() {
        let result = parse_tesseract_tsv("level\tleft\n1\t0\n");
        assert!(matches!(result, Err(OcrError::InvalidOutput(_))));
        assert!(parse_tesseract_tsv("").is_err());
    }

    #[test]
    fn test_parse_easyocr_scales_probability() {
        let body = r#"[
            [[[10, 5], [60, 5], [60, 25], [10, 25]], "Net Salary ", 0.875],
            [[[0, 40], [30, 40], [30, 55], [0, 55]], "4200", 0.5]
        ]"#;
        let tokens = parse_easyocr_detections(body).unwrap();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "Net Salary");
        assert_eq!(tokens[0].confidence, 87.5);
        assert_eq!(tokens[0].engine, OcrEngineKind::EasyOcr);
        assert_eq!(
            tokens[0].bounds,
            Some(BoundingBox { x: 10, y: 5, width: 50, height: 20 })
        );
        assert_eq!(tokens[1].confidence, 50.0);
    }

    #[test]
    fn test_parse_easyocr_garbage() {
        assert!(matches!(
            parse_easyocr_detections("{\"detail\": \"oops\"}"),
            Err(OcrError::InvalidOutput(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tesseract_runs_command_and_parses_tsv() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("fake-tesseract");
        std::fs::write(
            &script,
            "#!/bin/sh\nprintf 'level\\tleft\\ttop\\twidth\\theight\\tconf\\ttext\\n5\\t1\\t2\\t3\\t4\\t77\\tTOTAL\\n'\n",
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let engine = TesseractEngine::new(script.to_str().unwrap(), "eng");
        let tokens = engine.recognize(b"jpeg", &EngineParams::default()).await.unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "TOTAL");
        assert_eq!(tokens[0].confidence, 77.0);
    }

    #[tokio::test]
    async fn test_tesseract_missing_binary() {
        let engine = TesseractEngine::new("/nonexistent/tesseract-binary", "eng");
        let result = engine.recognize(b"jpeg", &EngineParams::default()).await;
        assert!(matches!(result, Err(OcrError::EngineNotAvailable(_))));
    }

    #[tokio::test]
    async fn test_easyocr_unreachable_is_unavailable() {
        let engine = EasyOcrEngine::new("http://127.0.0.1:1");
        assert!(!engine.is_available().await);
    }
}
