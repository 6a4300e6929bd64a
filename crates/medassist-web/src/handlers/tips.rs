use axum::Json;
use serde::Serialize;

use medassist_core::tips::health_tips;

#[derive(Debug, Serialize)]
pub struct TipsPayload {
    pub tips: Vec<String>,
    pub status: &'static str,
}

/// `GET /health-tips`. Static content, served even when generation is misconfigured.
pub async fn health_tips_list() -> Json<TipsPayload> {
    Json(TipsPayload { tips: health_tips(), status: "success" })
}
