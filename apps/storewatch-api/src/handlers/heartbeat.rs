//! 心跳接入接口
//!
//! - POST /heartbeat

use crate::AppState;
use crate::utils::response::{bad_request_error, internal_error};
use api_contract::{HeartbeatAck, HeartbeatRequest};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::now_epoch_ms;
use storewatch_ingest::IngestError;
use tracing::debug;

const MISSING_STORE_ID: &str = "loja_id é obrigatório no corpo da requisição.";
const HEARTBEAT_FAILED: &str = "Erro interno ao processar heartbeat.";

pub async fn post_heartbeat(
    State(state): State<AppState>,
    payload: Result<Json<HeartbeatRequest>, JsonRejection>,
) -> Response {
    // 无法解析的请求体按缺少 loja_id 处理
    let store_id = match payload {
        Ok(Json(request)) => request.loja_id,
        Err(rejection) => {
            debug!(target: "storewatch.api", error = %rejection, "heartbeat_body_rejected");
            None
        }
    };

    match state.ingest.record(store_id.as_deref(), now_epoch_ms()).await {
        Ok(record) => (
            StatusCode::OK,
            Json(HeartbeatAck::for_store(&record.store_id)),
        )
            .into_response(),
        Err(IngestError::Validation(_)) => bad_request_error(MISSING_STORE_ID),
        // 告警已在接入层发出
        Err(IngestError::Storage(_)) => internal_error(HEARTBEAT_FAILED),
    }
}
