//! Health check

use axum::{extract::State, Json};
use serde::Serialize;

use crate::ocr::OcrEngineKind;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    ocr_engines: Vec<OcrEngineKind>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        ocr_engines: state.ocr().engines(),
    })
}
