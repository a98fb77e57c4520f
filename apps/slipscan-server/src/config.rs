//! Configuration management for Slipscan Server

use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub provider: StorageProvider,
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: Option<String>,
    /// Base URL used to build public links to stored artifacts.
    /// Falls back to `{endpoint}/{bucket}` when unset.
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProvider {
    Minio,
    R2,
    S3,
    B2,
    /// In-process store, for local runs without an S3 endpoint
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract executable (name on PATH or absolute path)
    pub tesseract_cmd: String,
    /// Base URL of the EasyOCR reader service
    pub easyocr_url: String,
    /// Tesseract language used when a request does not name one
    pub default_language: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible API base (Groq by default)
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Fraction of page height removed from the top before OCR (extraction flow)
    pub crop_upper_percent: f32,
    /// Fraction of page height removed from the bottom before OCR (extraction flow)
    pub crop_lower_percent: f32,
    /// Rasterization DPI for PDFs in the extraction flow
    pub extract_pdf_dpi: u32,
    /// Rasterization DPI for PDFs in the OCR comparison flow
    pub ocr_pdf_dpi: u32,
    /// Largest accepted upload / download
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
            },
            storage: StorageConfig {
                provider: StorageProvider::Minio,
                endpoint: "http://localhost:9000".to_string(),
                bucket: "slipscan".to_string(),
                access_key: "admin".to_string(),
                secret_key: "password123".to_string(),
                region: Some("us-east-1".to_string()),
                public_url: None,
            },
            ocr: OcrConfig::default(),
            llm: LlmConfig::default(),
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: "tesseract".to_string(),
            easyocr_url: "http://localhost:8866".to_string(),
            default_language: "eng".to_string(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.groq.com/openai/v1".to_string(),
            api_key: None,
            model: "llama-3.1-70b-versatile".to_string(),
            temperature: 0.0,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            crop_upper_percent: 0.0,
            crop_lower_percent: 0.0,
            extract_pdf_dpi: 300,
            ocr_pdf_dpi: 72,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let pipeline_defaults = PipelineConfig::default();
        let provider = match env::var("S3_PROVIDER").unwrap_or_else(|_| "minio".to_string()).as_str() {
            "r2" => StorageProvider::R2,
            "s3" => StorageProvider::S3,
            "b2" => StorageProvider::B2,
            "memory" => StorageProvider::Memory,
            _ => StorageProvider::Minio,
        };
        // The in-process store needs no credentials
        let required = |name: &str| match provider {
            StorageProvider::Memory => Ok(env::var(name).unwrap_or_default()),
            _ => env::var(name),
        };

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_var("SERVER_PORT", 5000),
            },
            storage: StorageConfig {
                provider,
                endpoint: required("S3_ENDPOINT")?,
                bucket: required("S3_BUCKET")?,
                access_key: required("S3_ACCESS_KEY")?,
                secret_key: required("S3_SECRET_KEY")?,
                region: env::var("S3_REGION").ok(),
                public_url: env::var("S3_PUBLIC_URL").ok(),
            },
            ocr: OcrConfig {
                tesseract_cmd: env::var("TESSERACT_CMD").unwrap_or_else(|_| "tesseract".to_string()),
                easyocr_url: env::var("EASYOCR_URL")
                    .unwrap_or_else(|_| "http://localhost:8866".to_string()),
                default_language: env::var("OCR_LANGUAGE").unwrap_or_else(|_| "eng".to_string()),
            },
            llm: LlmConfig {
                base_url: env::var("LLM_BASE_URL")
                    .unwrap_or_else(|_| "https://api.groq.com/openai/v1".to_string()),
                api_key: env::var("GROQ_API_KEY").ok(),
                model: env::var("LLM_MODEL").unwrap_or_else(|_| "llama-3.1-70b-versatile".to_string()),
                temperature: parse_var("LLM_TEMPERATURE", 0.0),
            },
            pipeline: PipelineConfig {
                crop_upper_percent: parse_var("CROP_UPPER_PERCENT", pipeline_defaults.crop_upper_percent),
                crop_lower_percent: parse_var("CROP_LOWER_PERCENT", pipeline_defaults.crop_lower_percent),
                extract_pdf_dpi: parse_var("EXTRACT_PDF_DPI", pipeline_defaults.extract_pdf_dpi),
                ocr_pdf_dpi: parse_var("OCR_PDF_DPI", pipeline_defaults.ocr_pdf_dpi),
                max_upload_bytes: parse_var("MAX_UPLOAD_BYTES", pipeline_defaults.max_upload_bytes),
            },
        })
    }
}

/// Read and parse an optional variable, falling back on absence or garbage
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
