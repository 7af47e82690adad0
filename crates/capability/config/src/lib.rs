//! 应用运行配置加载。

use std::env;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required env: {0}")]
    Missing(String),
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub database_url: String,
    pub db_max_connections: u32,
    /// 超过该时长未收到心跳的在线门店会被降级。
    pub stale_window_ms: u64,
    /// 巡检周期；必须不大于 `stale_window_ms`，否则调度抖动会造成误报。
    pub check_interval_ms: u64,
    pub telegram_bot_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_base: String,
    pub notify_timeout_ms: u64,
    pub chat_commands_enabled: bool,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试中用 HashMap 代替进程环境）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("STOREWATCH_DATABASE_URL")
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ConfigError::Missing("STOREWATCH_DATABASE_URL".to_string()))?;
        let http_host =
            lookup("STOREWATCH_HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = read_u16_with_default(&lookup, "STOREWATCH_PORT", 3000)?;
        let db_max_connections =
            read_u32_with_default(&lookup, "STOREWATCH_DB_MAX_CONNECTIONS", 8)?;
        let stale_window_ms =
            read_positive_u64_with_default(&lookup, "STOREWATCH_STALE_WINDOW_MS", 150_000)?;
        let check_interval_ms =
            read_positive_u64_with_default(&lookup, "STOREWATCH_CHECK_INTERVAL_MS", 120_000)?;
        if stale_window_ms < check_interval_ms {
            return Err(ConfigError::Invalid(
                "STOREWATCH_STALE_WINDOW_MS".to_string(),
                format!("{stale_window_ms} < check interval {check_interval_ms}"),
            ));
        }
        let telegram_bot_token = read_optional(&lookup, "STOREWATCH_TELEGRAM_BOT_TOKEN");
        let telegram_chat_id = read_optional(&lookup, "STOREWATCH_TELEGRAM_CHAT_ID");
        let telegram_api_base = lookup("STOREWATCH_TELEGRAM_API_BASE")
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| "https://api.telegram.org".to_string());
        let notify_timeout_ms =
            read_positive_u64_with_default(&lookup, "STOREWATCH_NOTIFY_TIMEOUT_MS", 10_000)?;
        let chat_commands_enabled =
            read_bool_with_default(&lookup, "STOREWATCH_CHAT_COMMANDS", true);

        Ok(Self {
            http_addr: format!("{http_host}:{port}"),
            database_url,
            db_max_connections,
            stale_window_ms,
            check_interval_ms,
            telegram_bot_token,
            telegram_chat_id,
            telegram_api_base,
            notify_timeout_ms,
            chat_commands_enabled,
        })
    }

    /// 告警凭据：token 与目的会话同时配置才返回。
    pub fn notification_credentials(&self) -> Option<(&str, &str)> {
        match (&self.telegram_bot_token, &self.telegram_chat_id) {
            (Some(token), Some(chat_id)) => Some((token.as_str(), chat_id.as_str())),
            _ => None,
        }
    }
}

fn read_u16_with_default<F>(lookup: &F, key: &str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(key) {
        Some(value) => value,
        None => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u32_with_default<F>(lookup: &F, key: &str, default: u32) -> Result<u32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(key) {
        Some(value) => value,
        None => return Ok(default),
    };
    value
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_positive_u64_with_default<F>(
    lookup: &F,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match lookup(key) {
        Some(value) => value,
        None => return Ok(default),
    };
    match value.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(ConfigError::Invalid(key.to_string(), value)),
    }
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn read_bool_with_default<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "on"),
        None => default,
    }
}
