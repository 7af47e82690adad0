//! 门店心跳监控服务：HTTP 接入、离线巡检、聊天命令与生命周期管理。

mod chat;
mod handlers;
mod middleware;
mod routes;
#[cfg(test)]
mod test_support;
mod utils;

use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use storewatch_config::AppConfig;
use storewatch_ingest::HeartbeatIngest;
use storewatch_monitor::{Reconciler, ReconcilerConfig, spawn_reconciler};
use storewatch_notify::{Notifier, TelegramConfig, build_notifier, notify_best_effort};
use storewatch_status::StatusService;
use storewatch_storage::{PgStoreLedger, StorageError, StoreLedger};
use storewatch_telemetry::init_tracing;
use tokio::sync::watch;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub ingest: HeartbeatIngest,
    pub status: StatusService,
    pub notifier: Arc<dyn Notifier>,
}

impl AppState {
    pub fn new(ledger: Arc<dyn StoreLedger>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            ingest: HeartbeatIngest::new(ledger.clone(), notifier.clone()),
            status: StatusService::new(ledger),
            notifier,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("{0}")]
    Database(#[from] StorageError),
    #[error("http server: {0}")]
    Server(#[from] std::io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    init_tracing();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(target: "storewatch.api", error = %err, "config_invalid");
            return ExitCode::FAILURE;
        }
    };
    let notifier = match build_notifier(telegram_config(&config)) {
        Ok(notifier) => notifier,
        Err(err) => {
            error!(target: "storewatch.api", error = %err, "notifier_init_failed");
            return ExitCode::FAILURE;
        }
    };

    match run(config, notifier.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(target: "storewatch.api", error = %err, "service_terminated");
            let text = match &err {
                AppError::Database(cause) => format!(
                    "🔥 ERRO CRÍTICO! Falha ao inicializar o banco de dados. Encerrando: {cause}"
                ),
                AppError::Server(cause) => {
                    format!("🔥 ERRO CRÍTICO! Serviço encerrado por falha inesperada: {cause}")
                }
            };
            let _ = notify_best_effort(notifier.as_ref(), &text).await;
            ExitCode::FAILURE
        }
    }
}

fn telegram_config(config: &AppConfig) -> Option<TelegramConfig> {
    config
        .notification_credentials()
        .map(|(bot_token, chat_id)| TelegramConfig {
            api_base: config.telegram_api_base.clone(),
            bot_token: bot_token.to_string(),
            chat_id: chat_id.to_string(),
            timeout: Duration::from_millis(config.notify_timeout_ms),
        })
}

async fn run(config: AppConfig, notifier: Arc<dyn Notifier>) -> Result<(), AppError> {
    // 台账不可用时不监听端口、不启动巡检
    let ledger =
        Arc::new(PgStoreLedger::connect(&config.database_url, config.db_max_connections).await?);
    let listener = match tokio::net::TcpListener::bind(&config.http_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            ledger.close().await;
            return Err(err.into());
        }
    };
    info!(target: "storewatch.api", addr = %config.http_addr, "http_listening");

    let state = AppState::new(ledger.clone(), notifier.clone());
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reconciler = Reconciler::new(
        ledger.clone(),
        notifier.clone(),
        ReconcilerConfig::from_millis(config.stale_window_ms, config.check_interval_ms),
    );
    let reconciler_task = spawn_reconciler(reconciler, shutdown_rx.clone());
    let chat_task = chat::spawn_if_enabled(&config, state.status.clone(), notifier, shutdown_rx);

    let app = routes::build_app(state);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // 先停巡检与聊天轮询，再关闭连接池
    let _ = shutdown_tx.send(true);
    if let Err(err) = reconciler_task.await {
        warn!(target: "storewatch.api", error = %err, "reconciler_join_failed");
    }
    if let Some(task) = chat_task {
        if let Err(err) = task.await {
            warn!(target: "storewatch.api", error = %err, "chat_poller_join_failed");
        }
    }
    ledger.close().await;
    info!(target: "storewatch.api", "shutdown_complete");

    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(target: "storewatch.api", error = %err, "ctrl_c_listener_failed");
        std::future::pending::<()>().await;
    }
    info!(target: "storewatch.api", "shutdown_requested");
}
