//! HTTP routes for the Slipscan server

pub mod extract;
pub mod health;
pub mod images;
pub mod process;
pub mod upload;

mod multipart;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Files accepted in one `/extract` request
pub const MAX_BATCH_FILES: usize = 20;

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let max_upload = state.config().pipeline.max_upload_bytes;
    // multipart framing on top of the file itself
    let single = DefaultBodyLimit::max(max_upload.saturating_add(64 * 1024));
    let batch = DefaultBodyLimit::max(max_upload.saturating_mul(MAX_BATCH_FILES));

    Router::new()
        .route("/", get(health::health_check))
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .route("/api/upload", post(upload::upload_file).layer(single.clone()))
        .route("/api/images", get(images::list_images))
        .route("/process", post(process::process_url))
        .route("/process/upload", post(process::process_upload).layer(single))
        .route("/extract", post(extract::extract_upload).layer(batch))
        .route("/extract/folder", post(extract::extract_folder))
        .with_state(state)
}
