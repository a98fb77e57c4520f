//! Multipart form reading

use axum::extract::Multipart;

use crate::error::{AppError, Result};
use crate::ingest::{self, IngestError, SourceDocument};

/// Fields of a multipart form, files and text alike
#[derive(Debug, Default)]
pub struct Form {
    pub files: Vec<(String, SourceDocument)>,
    pub texts: Vec<(String, String)>,
}

impl Form {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    /// Documents uploaded under any of `names`, in form order
    pub fn take_files(&mut self, names: &[&str]) -> Vec<SourceDocument> {
        let (wanted, rest): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|(n, _)| names.contains(&n.as_str()));
        self.files = rest;
        wanted.into_iter().map(|(_, doc)| doc).collect()
    }
}

/// Read the whole form.
///
/// A part with a file name is a document: it must have an accepted
/// extension and fit under `max_bytes`. Other parts are kept as text.
pub async fn read_form(mut multipart: Multipart, max_bytes: usize) -> Result<Form> {
    let mut form = Form::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read upload: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match field.file_name().map(|s| s.to_string()) {
            Some(file_name) => {
                if file_name.trim().is_empty() {
                    return Err(IngestError::EmptyFileName.into());
                }

                let data = field.bytes().await.map_err(|e| {
                    tracing::error!("Failed to read file data: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;
                ingest::check_size(data.len(), max_bytes)?;

                tracing::debug!(field = %name, file_name = %file_name, size = data.len(), "Received file");
                form.files.push((name, SourceDocument::new(file_name, data.to_vec())?));
            }
            None => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read field {}: {}", name, e)))?;
                form.texts.push((name, value));
            }
        }
    }

    Ok(form)
}
