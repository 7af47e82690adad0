//! Telegram 聊天命令前端
//!
//! - 群组 / 超级群组中发送 `status`（不区分大小写）
//! - 任意会话中发送 `/status`（可带 `@bot` 后缀）
//!
//! 两者都回复同一份门店状态报表。轮询在停机时先于连接池关闭退出。

use std::sync::Arc;
use std::time::Duration;
use storewatch_config::AppConfig;
use storewatch_notify::{Notifier, TelegramClient, TelegramUpdate, notify_best_effort};
use storewatch_status::StatusService;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

const LONG_POLL_SECS: u64 = 30;
const RETRY_DELAY: Duration = Duration::from_secs(5);
const QUERY_FAILED_REPLY: &str = "Erro ao consultar o status das lojas.";

/// 判断一条文本消息是否为状态命令。
pub fn match_status_command(text: &str, chat_kind: &str) -> bool {
    let text = text.trim();
    if text.eq_ignore_ascii_case("status") {
        return matches!(chat_kind, "group" | "supergroup");
    }
    let Some(command) = text.split_whitespace().next() else {
        return false;
    };
    let name = command.split('@').next().unwrap_or(command);
    name.eq_ignore_ascii_case("/status")
}

/// 聊天命令处理器。
pub struct ChatPoller {
    client: TelegramClient,
    status: StatusService,
    notifier: Arc<dyn Notifier>,
    /// 告警会话；来自该会话的查询失败不再重复告警。
    alert_chat_id: Option<String>,
}

impl ChatPoller {
    pub fn new(
        client: TelegramClient,
        status: StatusService,
        notifier: Arc<dyn Notifier>,
        alert_chat_id: Option<String>,
    ) -> Self {
        Self {
            client,
            status,
            notifier,
            alert_chat_id,
        }
    }

    /// 生成命令回复。
    pub async fn answer(&self, chat_id: i64) -> String {
        match self.status.report().await {
            Ok(report) => report,
            Err(err) => {
                warn!(target: "storewatch.chat", chat_id, error = %err, "status_command_failed");
                let chat = chat_id.to_string();
                if self
                    .alert_chat_id
                    .as_deref()
                    .is_some_and(|alert_chat| alert_chat != chat)
                {
                    let text =
                        format!("🔴 ERRO! Falha ao obter status via Telegram no chat {chat}: {err}");
                    let _ = notify_best_effort(self.notifier.as_ref(), &text).await;
                }
                QUERY_FAILED_REPLY.to_string()
            }
        }
    }

    async fn handle_update(&self, update: &TelegramUpdate) {
        let Some(message) = &update.message else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };
        if !match_status_command(text, &message.chat.kind) {
            return;
        }
        info!(
            target: "storewatch.chat",
            chat_id = message.chat.id,
            chat_kind = %message.chat.kind,
            "status_command_received"
        );
        let reply = self.answer(message.chat.id).await;
        if let Err(err) = self
            .client
            .send_message(&message.chat.id.to_string(), &reply)
            .await
        {
            warn!(
                target: "storewatch.chat",
                chat_id = message.chat.id,
                error = %err,
                "status_reply_failed"
            );
        }
    }
}

/// 启动 `getUpdates` 长轮询任务，`shutdown` 置为 true 后退出。
pub fn spawn_chat_poller(poller: ChatPoller, mut shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(target: "storewatch.chat", "chat_poller_started");
        let mut offset: Option<i64> = None;
        loop {
            let polled = tokio::select! {
                polled = poller.client.get_updates(offset, LONG_POLL_SECS) => polled,
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        poller.handle_update(&update).await;
                    }
                }
                Err(err) => {
                    warn!(target: "storewatch.chat", error = %err, "get_updates_failed");
                    tokio::select! {
                        _ = tokio::time::sleep(RETRY_DELAY) => {}
                        changed = shutdown.changed() => {
                            if changed.is_err() || *shutdown.borrow() {
                                break;
                            }
                        }
                    }
                }
            }
        }
        info!(target: "storewatch.chat", "chat_poller_stopped");
    })
}

/// 配置允许且存在 bot token 时启动聊天轮询。
pub fn spawn_if_enabled(
    config: &AppConfig,
    status: StatusService,
    notifier: Arc<dyn Notifier>,
    shutdown: watch::Receiver<bool>,
) -> Option<JoinHandle<()>> {
    if !config.chat_commands_enabled {
        info!(target: "storewatch.chat", "chat commands disabled by config");
        return None;
    }
    let Some(bot_token) = config.telegram_bot_token.as_deref() else {
        info!(target: "storewatch.chat", "chat commands disabled (no bot token)");
        return None;
    };
    let client = match TelegramClient::new(
        &config.telegram_api_base,
        bot_token,
        Duration::from_millis(config.notify_timeout_ms),
    ) {
        Ok(client) => client,
        Err(err) => {
            warn!(target: "storewatch.chat", error = %err, "chat_client_init_failed");
            return None;
        }
    };
    let poller = ChatPoller::new(client, status, notifier, config.telegram_chat_id.clone());
    Some(spawn_chat_poller(poller, shutdown))
}
