//! 状态查询：台账的只读投影。
//!
//! 同一份快照有两种呈现：
//! - `to_dto`：HTTP 响应（ISO-8601 时间，从未上报为 null）
//! - `render_report`：聊天命令回复（本地时间，人工阅读）

use api_contract::StoreStatusDto;
use domain::{StoreStatus, format_iso8601, format_local};
use std::sync::Arc;
use storewatch_storage::{StorageError, StoreLedger, StoreRecord};
use tracing::debug;

const EMPTY_REPORT: &str = "Nenhuma loja registrada ainda.";
const REPORT_HEADER: &str = "Status das Lojas:";
const NEVER_PINGED: &str = "Nunca pingou";

/// 状态查询服务。
#[derive(Clone)]
pub struct StatusService {
    ledger: Arc<dyn StoreLedger>,
}

impl StatusService {
    pub fn new(ledger: Arc<dyn StoreLedger>) -> Self {
        Self { ledger }
    }

    /// 读取全部门店（按门店 ID 排序），不做任何写入。
    pub async fn get_status(&self) -> Result<Vec<StoreRecord>, StorageError> {
        let records = self.ledger.read_all().await?;
        debug!(target: "storewatch.status", stores = records.len(), "status_snapshot_read");
        Ok(records)
    }

    pub async fn get_status_dtos(&self) -> Result<Vec<StoreStatusDto>, StorageError> {
        Ok(self.get_status().await?.iter().map(to_dto).collect())
    }

    pub async fn report(&self) -> Result<String, StorageError> {
        Ok(render_report(&self.get_status().await?))
    }
}

pub fn to_dto(record: &StoreRecord) -> StoreStatusDto {
    StoreStatusDto {
        loja_id: record.store_id.clone(),
        ultimo_ping: record.last_ping_ms.and_then(format_iso8601),
        status: record.status.as_str().to_string(),
    }
}

/// 渲染聊天报表；空台账返回固定提示。
pub fn render_report(records: &[StoreRecord]) -> String {
    if records.is_empty() {
        return EMPTY_REPORT.to_string();
    }
    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(REPORT_HEADER.to_string());
    for record in records {
        let icon = match record.status {
            StoreStatus::Online => "✅",
            StoreStatus::Offline => "❌",
        };
        let last_seen = record
            .last_ping_ms
            .and_then(format_local)
            .unwrap_or_else(|| NEVER_PINGED.to_string());
        lines.push(format!(
            "{icon} Loja {}: {} (último ping: {last_seen})",
            record.store_id, record.status
        ));
    }
    lines.join("\n")
}
