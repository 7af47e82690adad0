//! 离线巡检（对账循环）。
//!
//! 每个周期从台账重新推导候选，不在内存中保存任何跨周期状态：
//!
//! 1. `threshold = now - stale_window`
//! 2. `candidates = read_stale(threshold)`
//! 3. 每个候选独立处理：`mark_offline` 成功且确实发生降级才发送离线告警；
//!    降级写入或告警失败时发送另一条错误告警，不影响其他候选
//!
//! 已离线的门店不会再出现在 `read_stale` 中，因此同一次状态迁移最多告警一次。

mod reconciler;

pub use reconciler::{CycleReport, Reconciler, ReconcilerConfig, spawn_reconciler};
