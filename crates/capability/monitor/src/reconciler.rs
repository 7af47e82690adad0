use domain::{format_iso8601, now_epoch_ms};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use storewatch_notify::{Notifier, notify_best_effort};
use storewatch_storage::{StaleStore, StoreLedger};
use storewatch_telemetry::{
    record_cycle_run, record_demotion_failure, record_notification_failed,
    record_notification_sent, record_store_demoted,
};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{error, info, warn};

/// 巡检参数。
#[derive(Debug, Clone, Copy)]
pub struct ReconcilerConfig {
    /// 超过该时长未收到心跳即可被降级。
    pub stale_window: Duration,
    /// 巡检周期。
    pub check_interval: Duration,
}

impl ReconcilerConfig {
    /// 巡检周期至少 1 毫秒（`interval` 不接受零周期）。
    pub fn from_millis(stale_window_ms: u64, check_interval_ms: u64) -> Self {
        Self {
            stale_window: Duration::from_millis(stale_window_ms),
            check_interval: Duration::from_millis(check_interval_ms.max(1)),
        }
    }

    fn stale_window_ms(&self) -> i64 {
        i64::try_from(self.stale_window.as_millis()).unwrap_or(i64::MAX)
    }
}

/// 单个周期的处理结果（门店 ID 均已排序）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub threshold_ms: i64,
    pub candidates: usize,
    /// 本周期真正被降级的门店。
    pub demoted: Vec<String>,
    /// 扫描之后已被刷新或已离线，未降级。
    pub skipped: Vec<String>,
    /// 降级写入失败（或处理任务异常）的门店。
    pub failed: Vec<String>,
    /// 降级成功但离线告警未送达的门店。
    pub notify_failed: Vec<String>,
    /// 候选扫描本身失败。
    pub scan_failed: bool,
}

enum Outcome {
    Demoted { notified: bool },
    Skipped,
    Failed,
}

/// 离线巡检器：持有台账与告警通道，可廉价克隆。
#[derive(Clone)]
pub struct Reconciler {
    ledger: Arc<dyn StoreLedger>,
    notifier: Arc<dyn Notifier>,
    config: ReconcilerConfig,
}

impl Reconciler {
    pub fn new(
        ledger: Arc<dyn StoreLedger>,
        notifier: Arc<dyn Notifier>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            ledger,
            notifier,
            config,
        }
    }

    pub fn config(&self) -> ReconcilerConfig {
        self.config
    }

    /// 以 `now_ms` 为当前时间执行一个巡检周期。
    pub async fn run_cycle(&self, now_ms: i64) -> CycleReport {
        record_cycle_run();
        let threshold_ms = now_ms.saturating_sub(self.config.stale_window_ms());
        let mut report = CycleReport {
            threshold_ms,
            ..CycleReport::default()
        };

        let candidates = match self.ledger.read_stale(threshold_ms).await {
            Ok(candidates) => candidates,
            Err(err) => {
                warn!(target: "storewatch.monitor", error = %err, "stale_scan_failed");
                let text = format!("🔴 ERRO! Falha geral no verificador offline: {err}");
                let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                report.scan_failed = true;
                return report;
            }
        };

        if candidates.is_empty() {
            info!(target: "storewatch.monitor", threshold_ms, "reconcile_cycle_idle");
            return report;
        }

        report.candidates = candidates.len();
        info!(
            target: "storewatch.monitor",
            threshold_ms,
            candidates = candidates.len(),
            "stale_stores_detected"
        );

        // 候选之间无顺序依赖：各自一个任务，任一任务失败或 panic 不影响其他候选
        let mut pending: HashSet<String> = HashSet::with_capacity(candidates.len());
        let mut tasks = JoinSet::new();
        for candidate in candidates {
            pending.insert(candidate.store_id.clone());
            let this = self.clone();
            tasks.spawn(async move {
                let outcome = this.demote(&candidate, threshold_ms).await;
                (candidate.store_id, outcome)
            });
        }
        while let Some(joined) = tasks.join_next().await {
            if let Ok((store_id, _)) = &joined {
                pending.remove(store_id);
            }
            match joined {
                Ok((store_id, Outcome::Demoted { notified })) => {
                    if !notified {
                        report.notify_failed.push(store_id.clone());
                    }
                    report.demoted.push(store_id);
                }
                Ok((store_id, Outcome::Skipped)) => report.skipped.push(store_id),
                Ok((store_id, Outcome::Failed)) => report.failed.push(store_id),
                Err(err) => {
                    error!(target: "storewatch.monitor", error = %err, "demotion_task_aborted");
                    let text = format!("🔥 ERRO! Falha inesperada ao processar loja offline: {err}");
                    let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                }
            }
        }
        // 剩余的即为 panic 或被中止的任务
        report.failed.extend(pending);
        report.demoted.sort();
        report.skipped.sort();
        report.failed.sort();
        report.notify_failed.sort();

        info!(
            target: "storewatch.monitor",
            demoted = report.demoted.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "reconcile_cycle_completed"
        );
        report
    }

    /// 在独立任务中执行一个周期，周期内的 panic 被记录并告警，不会传播给调用方。
    pub async fn run_cycle_isolated(&self, now_ms: i64) -> Option<CycleReport> {
        let this = self.clone();
        match tokio::spawn(async move { this.run_cycle(now_ms).await }).await {
            Ok(report) => Some(report),
            Err(err) => {
                error!(target: "storewatch.monitor", error = %err, "reconcile_cycle_aborted");
                let text = format!("🔥 ERRO! Ciclo do verificador offline abortado: {err}");
                let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                None
            }
        }
    }

    async fn demote(&self, candidate: &StaleStore, threshold_ms: i64) -> Outcome {
        let store_id = candidate.store_id.as_str();
        let last_seen = candidate
            .last_ping_ms
            .and_then(format_iso8601)
            .unwrap_or_else(|| "nunca".to_string());

        match self.ledger.mark_offline(store_id, threshold_ms).await {
            Ok(true) => {
                record_store_demoted();
                info!(
                    target: "storewatch.monitor",
                    store_id = %store_id,
                    last_ping = %last_seen,
                    "store_marked_offline"
                );
                let text =
                    format!("🔴 A Loja {store_id} foi marcada como offline (último ping: {last_seen}).");
                match self.notifier.send(&text).await {
                    Ok(()) => {
                        record_notification_sent();
                        Outcome::Demoted { notified: true }
                    }
                    Err(err) => {
                        record_notification_failed();
                        warn!(
                            target: "storewatch.monitor",
                            store_id = %store_id,
                            error = %err,
                            "offline_notification_failed"
                        );
                        let text = format!(
                            "🔴 ERRO! Falha ao notificar que a loja {store_id} ficou offline: {err}"
                        );
                        let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                        Outcome::Demoted { notified: false }
                    }
                }
            }
            Ok(false) => {
                info!(target: "storewatch.monitor", store_id = %store_id, "demotion_skipped");
                Outcome::Skipped
            }
            Err(err) => {
                record_demotion_failure();
                warn!(
                    target: "storewatch.monitor",
                    store_id = %store_id,
                    error = %err,
                    "mark_offline_failed"
                );
                let text =
                    format!("🔴 ERRO! Falha ao marcar loja {store_id} como offline: {err}");
                let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                Outcome::Failed
            }
        }
    }
}

/// 启动周期巡检任务。
///
/// - 首个周期在一个 `check_interval` 之后执行
/// - 周期串行执行；上一周期超时占用的 tick 直接跳过，从不并发运行两个周期
/// - `shutdown` 置为 true（或发送端被丢弃）后退出；正在执行的周期会先跑完
pub fn spawn_reconciler(
    reconciler: Reconciler,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = reconciler.config().check_interval.max(Duration::from_millis(1));
        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(
            target: "storewatch.monitor",
            check_interval_ms = period.as_millis() as u64,
            stale_window_ms = reconciler.config().stale_window.as_millis() as u64,
            "reconciler_started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let _ = reconciler.run_cycle_isolated(now_epoch_ms()).await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(target: "storewatch.monitor", "reconciler_stopped");
    })
}
