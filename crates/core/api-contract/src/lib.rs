//! 稳定的 DTO 与 API 响应契约。
//!
//! 字段名沿用门店端已部署客户端的约定（`loja_id`、`ultimo_ping`），不做 camelCase 转换。

use serde::{Deserialize, Serialize};

/// 心跳请求体。
///
/// `loja_id` 声明为可选，缺失与空串统一由接入层判定为校验错误。
#[derive(Debug, Deserialize)]
pub struct HeartbeatRequest {
    #[serde(default)]
    pub loja_id: Option<String>,
}

/// 心跳确认响应体。
#[derive(Debug, Serialize)]
pub struct HeartbeatAck {
    pub message: String,
}

impl HeartbeatAck {
    pub fn for_store(store_id: &str) -> Self {
        Self {
            message: format!("Heartbeat recebido para loja {store_id}"),
        }
    }
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// 门店状态返回结构。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatusDto {
    pub loja_id: String,
    /// ISO-8601；从未上报时为 null。
    pub ultimo_ping: Option<String>,
    pub status: String,
}

/// 计数器快照返回结构。
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub heartbeats_accepted: u64,
    pub heartbeats_rejected: u64,
    pub heartbeats_failed: u64,
    pub cycles_run: u64,
    pub stores_demoted: u64,
    pub demotion_failures: u64,
    pub notifications_sent: u64,
    pub notifications_failed: u64,
}
