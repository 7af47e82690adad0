//! 状态查询接口
//!
//! - GET /status

use crate::AppState;
use crate::utils::response::internal_error;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storewatch_notify::notify_best_effort;
use tracing::warn;

const STATUS_FAILED: &str = "Erro interno ao consultar status.";

pub async fn get_status(State(state): State<AppState>) -> Response {
    match state.status.get_status_dtos().await {
        Ok(stores) => (StatusCode::OK, Json(stores)).into_response(),
        Err(err) => {
            warn!(target: "storewatch.api", error = %err, "status_query_failed");
            let text = format!("🔴 ERRO! Falha ao obter status via HTTP: {err}");
            let _ = notify_best_effort(state.notifier.as_ref(), &text).await;
            internal_error(STATUS_FAILED)
        }
    }
}
