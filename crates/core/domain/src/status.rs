//! 门店在线状态。

use std::fmt;
use std::str::FromStr;

/// 门店派生状态：只有在线与离线两种。
///
/// 心跳接入是唯一把状态提升为 `Online` 的写入方，
/// 离线巡检是唯一把状态降级为 `Offline` 的写入方。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreStatus {
    Online,
    Offline,
}

impl StoreStatus {
    /// 持久化与对外接口使用的字符串形式。
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Online => "online",
            StoreStatus::Offline => "offline",
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, StoreStatus::Online)
    }
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 未知状态字符串。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStoreStatusError(pub String);

impl fmt::Display for ParseStoreStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown store status: {}", self.0)
    }
}

impl std::error::Error for ParseStoreStatusError {}

impl FromStr for StoreStatus {
    type Err = ParseStoreStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Ok(StoreStatus::Online),
            "offline" => Ok(StoreStatus::Offline),
            _ => Err(ParseStoreStatusError(value.to_string())),
        }
    }
}
