//! 心跳接入：校验门店 ID，写入台账，把门店提升为 online。
//!
//! 每次调用恰好一次台账写入；重复心跳在台账层面是幂等的。
//! 写库失败时在返回错误之前尽力发送一条告警。

use std::sync::Arc;
use storewatch_notify::{Notifier, notify_best_effort};
use storewatch_storage::{StorageError, StoreLedger, StoreRecord};
use storewatch_telemetry::{
    record_heartbeat_accepted, record_heartbeat_failed, record_heartbeat_rejected,
};
use tracing::{info, warn};

/// 心跳接入错误。
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// 输入不合法，不产生任何写入，也不告警。
    #[error("validation error: {0}")]
    Validation(String),
    /// 台账写入失败，已尝试告警。
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// 心跳接入服务。
#[derive(Clone)]
pub struct HeartbeatIngest {
    ledger: Arc<dyn StoreLedger>,
    notifier: Arc<dyn Notifier>,
}

impl HeartbeatIngest {
    pub fn new(ledger: Arc<dyn StoreLedger>, notifier: Arc<dyn Notifier>) -> Self {
        Self { ledger, notifier }
    }

    /// 记录一次心跳。
    ///
    /// # 参数
    /// - `store_id`：门店上报的标识（缺失或空白即校验失败）
    /// - `arrival_ms`：服务端收到心跳的时间（epoch 毫秒）
    pub async fn record(
        &self,
        store_id: Option<&str>,
        arrival_ms: i64,
    ) -> Result<StoreRecord, IngestError> {
        // 门店 ID 原样入账，空白只用于判空
        let store_id = match store_id {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                record_heartbeat_rejected();
                return Err(IngestError::Validation("loja_id required".to_string()));
            }
        };

        match self.ledger.upsert_heartbeat(store_id, arrival_ms).await {
            Ok(record) => {
                record_heartbeat_accepted();
                info!(
                    target: "storewatch.ingest",
                    store_id = %record.store_id,
                    arrival_ms = arrival_ms,
                    last_ping_ms = ?record.last_ping_ms,
                    "heartbeat_recorded"
                );
                Ok(record)
            }
            Err(err) => {
                record_heartbeat_failed();
                warn!(
                    target: "storewatch.ingest",
                    store_id = %store_id,
                    error = %err,
                    "heartbeat_write_failed"
                );
                let text = format!(
                    "🔴 ERRO! Falha ao processar heartbeat para loja {store_id}: {err}"
                );
                let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                Err(IngestError::Storage(err))
            }
        }
    }
}
