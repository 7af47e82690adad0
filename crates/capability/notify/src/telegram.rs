//! Telegram Bot API 客户端。
//!
//! - `sendMessage`：告警与聊天命令回复
//! - `getUpdates`：聊天命令长轮询

use crate::{Notifier, NotifyError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// Telegram 通道配置。
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub api_base: String,
    pub bot_token: String,
    /// 告警目的地。
    pub chat_id: String,
    /// 单次发送的超时上限。
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

/// 聊天更新（只关心文本消息）。
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUpdate {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub chat: TelegramChat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramChat {
    pub id: i64,
    /// private / group / supergroup / channel
    #[serde(rename = "type")]
    pub kind: String,
}

/// Bot API 低层客户端。
#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl TelegramClient {
    pub fn new(api_base: &str, bot_token: &str, timeout: Duration) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            bot_token: bot_token.to_string(),
        })
    }

    pub fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_base, self.bot_token, method)
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), NotifyError> {
        let body = serde_json::json!({ "chat_id": chat_id, "text": text });
        let response = self
            .http
            .post(self.method_url("sendMessage"))
            .json(&body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let status = response.status();
        let envelope: Envelope<serde_json::Value> = response
            .json()
            .await
            .map_err(|err| NotifyError::Response(err.to_string()))?;
        if !status.is_success() || !envelope.ok {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: envelope.description.unwrap_or_default(),
            });
        }
        Ok(())
    }

    /// 长轮询拉取 `offset` 之后的更新。
    ///
    /// 请求超时在长轮询时长之上再留 10 秒余量。
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        long_poll_secs: u64,
    ) -> Result<Vec<TelegramUpdate>, NotifyError> {
        let mut body = serde_json::json!({
            "timeout": long_poll_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        let response = self
            .http
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(long_poll_secs + 10))
            .json(&body)
            .send()
            .await
            .map_err(|err| NotifyError::Transport(err.to_string()))?;
        let status = response.status();
        let envelope: Envelope<Vec<TelegramUpdate>> = response
            .json()
            .await
            .map_err(|err| NotifyError::Response(err.to_string()))?;
        if !status.is_success() || !envelope.ok {
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                description: envelope.description.unwrap_or_default(),
            });
        }
        Ok(envelope.result.unwrap_or_default())
    }
}

/// 发往固定告警会话的 Telegram 通道。
#[derive(Clone)]
pub struct TelegramNotifier {
    client: TelegramClient,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let client = TelegramClient::new(&config.api_base, &config.bot_token, config.timeout)?;
        Ok(Self {
            client,
            chat_id: config.chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.client.send_message(&self.chat_id, text).await
    }
}
