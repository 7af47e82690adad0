//! 告警通道适配层。
//!
//! 告警是尽力而为的：发送失败只记录日志，从不变成调用方自身的失败，
//! 也不会回滚已经完成的状态写入。

pub mod telegram;

use async_trait::async_trait;
use std::sync::Arc;
use storewatch_telemetry::{record_notification_failed, record_notification_sent};
use tracing::{info, warn};

pub use telegram::{
    TelegramChat, TelegramClient, TelegramConfig, TelegramMessage, TelegramNotifier,
    TelegramUpdate,
};

/// 告警发送错误。
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("channel rejected message ({status}): {description}")]
    Rejected { status: u16, description: String },
    #[error("invalid channel response: {0}")]
    Response(String),
}

/// 告警通道抽象。
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// 未配置凭据时的降级实现：只写日志，不发送。
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        warn!(target: "storewatch.notify", text = %text, "notification_channel_disabled");
        Ok(())
    }
}

/// 尽力发送一条告警，返回是否成功。
///
/// 调用方可以忽略返回值；失败只记录日志与计数。
pub async fn notify_best_effort(notifier: &dyn Notifier, text: &str) -> bool {
    match notifier.send(text).await {
        Ok(()) => {
            record_notification_sent();
            info!(target: "storewatch.notify", "notification_sent");
            true
        }
        Err(err) => {
            record_notification_failed();
            warn!(target: "storewatch.notify", error = %err, text = %text, "notification_failed");
            false
        }
    }
}

/// 根据凭据选择通道：token 与 chat_id 同时存在才启用 Telegram。
pub fn build_notifier(config: Option<TelegramConfig>) -> Result<Arc<dyn Notifier>, NotifyError> {
    match config {
        Some(config) => {
            info!(
                target: "storewatch.notify",
                chat_id = %config.chat_id,
                api_base = %config.api_base,
                "notification channel: telegram"
            );
            Ok(Arc::new(TelegramNotifier::new(config)?))
        }
        None => {
            warn!(
                target: "storewatch.notify",
                "notification channel: log only (telegram credentials not configured)"
            );
            Ok(Arc::new(LogNotifier))
        }
    }
}
