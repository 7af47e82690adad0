//! Handlers 模块

pub mod heartbeat;
pub mod metrics;
pub mod status;

pub use heartbeat::*;
pub use metrics::*;
pub use status::*;

use axum::{Json, response::IntoResponse};

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}
