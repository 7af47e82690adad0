//! 存储接口 Trait 定义
//!
//! 台账是整个系统唯一共享的可变资源。设计原则：
//! - 单行读改写由存储引擎保证原子性，应用层不加锁
//! - 所有接口返回 StorageError，不在内部重试
//! - 使用 async_trait 支持动态分发（`Arc<dyn StoreLedger>`）

use crate::error::StorageError;
use crate::models::{StaleStore, StoreRecord};
use async_trait::async_trait;

/// 门店台账接口
#[async_trait]
pub trait StoreLedger: Send + Sync {
    /// 建档或刷新心跳，状态无条件置为 online。
    ///
    /// 同一门店的并发调用不会丢失更新；`last_ping_ms` 取已有值与新值中较大者。
    async fn upsert_heartbeat(
        &self,
        store_id: &str,
        ts_ms: i64,
    ) -> Result<StoreRecord, StorageError>;

    /// 全量快照，同一次调用内顺序稳定（按门店 ID 排序）。
    async fn read_all(&self) -> Result<Vec<StoreRecord>, StorageError>;

    /// 在线且心跳为空或严格早于 `threshold_ms` 的门店。
    async fn read_stale(&self, threshold_ms: i64) -> Result<Vec<StaleStore>, StorageError>;

    /// 降级为 offline，返回本次调用是否真正执行了降级。
    ///
    /// 已离线、未知门店、或在 `stale_before_ms` 之后又收到心跳的门店均为 no-op（返回 false）。
    async fn mark_offline(
        &self,
        store_id: &str,
        stale_before_ms: i64,
    ) -> Result<bool, StorageError>;
}
