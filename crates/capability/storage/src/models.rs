//! 数据模型定义
//!
//! - StoreRecord：台账中的一行（门店 ID、最后心跳、状态）
//! - StaleStore：巡检扫描得到的超时候选

use domain::StoreStatus;

/// 门店台账记录。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreRecord {
    /// 门店端上报的标识，从不在内部生成。
    pub store_id: String,
    /// 最后一次心跳（epoch 毫秒）。
    pub last_ping_ms: Option<i64>,
    pub status: StoreStatus,
}

/// 超时候选：当前在线但心跳早于阈值的门店。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleStore {
    pub store_id: String,
    pub last_ping_ms: Option<i64>,
}

impl StaleStore {
    /// 心跳为空或严格早于阈值即视为超时。
    pub fn is_stale(last_ping_ms: Option<i64>, threshold_ms: i64) -> bool {
        match last_ping_ms {
            Some(ts_ms) => ts_ms < threshold_ms,
            None => true,
        }
    }
}
