//! 追踪、请求 ID 与进程内计数器。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 计数器快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
    pub heartbeats_accepted: u64,
    pub heartbeats_rejected: u64,
    pub heartbeats_failed: u64,
    pub cycles_run: u64,
    pub stores_demoted: u64,
    pub demotion_failures: u64,
    pub notifications_sent: u64,
    pub notifications_failed: u64,
}

/// 进程内计数器（只增不减，重启清零）。
pub struct TelemetryMetrics {
    heartbeats_accepted: AtomicU64,
    heartbeats_rejected: AtomicU64,
    heartbeats_failed: AtomicU64,
    cycles_run: AtomicU64,
    stores_demoted: AtomicU64,
    demotion_failures: AtomicU64,
    notifications_sent: AtomicU64,
    notifications_failed: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            heartbeats_accepted: AtomicU64::new(0),
            heartbeats_rejected: AtomicU64::new(0),
            heartbeats_failed: AtomicU64::new(0),
            cycles_run: AtomicU64::new(0),
            stores_demoted: AtomicU64::new(0),
            demotion_failures: AtomicU64::new(0),
            notifications_sent: AtomicU64::new(0),
            notifications_failed: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            heartbeats_accepted: self.heartbeats_accepted.load(Ordering::Relaxed),
            heartbeats_rejected: self.heartbeats_rejected.load(Ordering::Relaxed),
            heartbeats_failed: self.heartbeats_failed.load(Ordering::Relaxed),
            cycles_run: self.cycles_run.load(Ordering::Relaxed),
            stores_demoted: self.stores_demoted.load(Ordering::Relaxed),
            demotion_failures: self.demotion_failures.load(Ordering::Relaxed),
            notifications_sent: self.notifications_sent.load(Ordering::Relaxed),
            notifications_failed: self.notifications_failed.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局计数器实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录心跳写入成功次数。
pub fn record_heartbeat_accepted() {
    metrics().heartbeats_accepted.fetch_add(1, Ordering::Relaxed);
}

/// 记录心跳校验失败次数（缺少门店 ID）。
pub fn record_heartbeat_rejected() {
    metrics().heartbeats_rejected.fetch_add(1, Ordering::Relaxed);
}

/// 记录心跳写库失败次数。
pub fn record_heartbeat_failed() {
    metrics().heartbeats_failed.fetch_add(1, Ordering::Relaxed);
}

/// 记录巡检周期执行次数。
pub fn record_cycle_run() {
    metrics().cycles_run.fetch_add(1, Ordering::Relaxed);
}

/// 记录门店被降级为离线的次数。
pub fn record_store_demoted() {
    metrics().stores_demoted.fetch_add(1, Ordering::Relaxed);
}

/// 记录降级写入失败次数。
pub fn record_demotion_failure() {
    metrics().demotion_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录告警发送成功次数。
pub fn record_notification_sent() {
    metrics().notifications_sent.fetch_add(1, Ordering::Relaxed);
}

/// 记录告警发送失败次数。
pub fn record_notification_failed() {
    metrics()
        .notifications_failed
        .fetch_add(1, Ordering::Relaxed);
}
