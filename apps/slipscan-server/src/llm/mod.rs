//! LLM field extraction
//!
//! Sends recognized text through a document-type prompt and returns the
//! model's free-text answer. Parsing that answer into fields is the job of
//! [`crate::extraction`].

mod groq;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use groq::GroqClient;
pub use prompts::DocumentType;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("LLM API key not configured")]
    MissingApiKey,

    #[error("Invalid input type: {0}")]
    UnknownDocumentType(String),

    #[error("LLM request failed: {0}")]
    Request(String),

    #[error("LLM API error: {0}")]
    Api(String),

    #[error("LLM returned no content")]
    EmptyResponse,
}

impl LlmError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            Self::UnknownDocumentType(_) => StatusCode::BAD_REQUEST,
            Self::MissingApiKey => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// Chat-completion capability
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a single user prompt and return the reply text
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Ask the model for the fields of `doc_type` found in `ocr_text`
pub async fn extract_fields(
    client: &dyn LlmClient,
    doc_type: DocumentType,
    ocr_text: &str,
) -> Result<String, LlmError> {
    let prompt = doc_type.prompt(ocr_text);
    tracing::debug!(document_type = %doc_type, prompt_len = prompt.len(), "Sending extraction prompt");

    let reply = client.complete(&prompt).await?;
    if reply.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct RecordingClient {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmClient for RecordingClient {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    #[tokio::test]
    async fn test_extract_fields_uses_document_prompt() {
        let client = RecordingClient {
            reply: "1. Net Salary: 4200".to_string(),
            prompts: Mutex::new(Vec::new()),
        };

        let reply = extract_fields(&client, DocumentType::SalarySlip, "NET 4200")
            .await
            .unwrap();
        assert_eq!(reply, "1. Net Salary: 4200");

        let prompts = client.prompts.lock();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("salary slip"));
        assert!(prompts[0].ends_with("Text: NET 4200"));
    }

    #[tokio::test]
    async fn test_blank_reply_is_an_error() {
        let client = RecordingClient {
            reply: "  \n".to_string(),
            prompts: Mutex::new(Vec::new()),
        };
        let result = extract_fields(&client, DocumentType::CashSlip, "x").await;
        assert!(matches!(result, Err(LlmError::EmptyResponse)));
    }
}
