//! 时间戳辅助函数。
//!
//! 台账中的时间统一为 Unix epoch 毫秒（i64）：
//! - 机器消费方：ISO-8601（UTC，毫秒精度，`Z` 结尾）
//! - 人工阅读：本地时区的日/月/年 时:分:秒

use chrono::{DateTime, Local, SecondsFormat, Utc};

/// 获取当前 Unix 时间戳（毫秒）
pub fn now_epoch_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// 毫秒时间戳转 ISO-8601，超出可表示范围时返回 None。
pub fn format_iso8601(ts_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// 毫秒时间戳转本地时间展示字符串。
pub fn format_local(ts_ms: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp_millis(ts_ms).map(|dt| {
        dt.with_timezone(&Local)
            .format("%d/%m/%Y %H:%M:%S")
            .to_string()
    })
}
