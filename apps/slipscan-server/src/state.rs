//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::llm::{GroqClient, LlmClient};
use crate::ocr::OcrService;
use crate::pdf::{MupdfRasterizer, PageRasterizer};
use crate::storage::ObjectStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    store: Arc<dyn ObjectStore>,
    ocr: OcrService,
    llm: Arc<dyn LlmClient>,
    rasterizer: Arc<dyn PageRasterizer>,
    http: reqwest::Client,
}

impl AppState {
    /// Create the state with the production engines built from `config`
    pub fn new(config: Config, store: Arc<dyn ObjectStore>) -> Self {
        let ocr = OcrService::new(&config.ocr);
        let llm = Arc::new(GroqClient::new(&config.llm));
        Self::from_parts(config, store, ocr, llm, Arc::new(MupdfRasterizer::new()))
    }

    /// Create the state from explicit components
    pub fn from_parts(
        config: Config,
        store: Arc<dyn ObjectStore>,
        ocr: OcrService,
        llm: Arc<dyn LlmClient>,
        rasterizer: Arc<dyn PageRasterizer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                ocr,
                llm,
                rasterizer,
                http: reqwest::Client::new(),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the object store
    pub fn store(&self) -> &dyn ObjectStore {
        self.inner.store.as_ref()
    }

    /// Get the OCR service
    pub fn ocr(&self) -> &OcrService {
        &self.inner.ocr
    }

    /// Get the LLM client
    pub fn llm(&self) -> &dyn LlmClient {
        self.inner.llm.as_ref()
    }

    /// Get the PDF rasterizer
    pub fn rasterizer(&self) -> &dyn PageRasterizer {
        self.inner.rasterizer.as_ref()
    }

    /// HTTP client for remote downloads
    pub fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }
}
