//! Stored image listing

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ingest::DocumentKind;
use crate::state::AppState;

const DEFAULT_FOLDER: &str = "processed_files";
const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
pub struct ImagesQuery {
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

/// GET /api/images?folder=<prefix>&limit=<n>
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ImagesQuery>,
) -> Result<Json<ImagesResponse>> {
    let folder = query.folder.as_deref().unwrap_or(DEFAULT_FOLDER);
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT);

    let objects = state.store().list_where(folder, limit, is_image_key).await?;
    let images: Vec<String> = objects.iter().map(|o| state.store().url_for(&o.key)).collect();

    tracing::debug!(folder = %folder, count = images.len(), "Listed images");
    Ok(Json(ImagesResponse { images }))
}

fn is_image_key(key: &str) -> bool {
    matches!(DocumentKind::from_name(key), Some(DocumentKind::Image))
}
