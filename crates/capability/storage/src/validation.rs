//! 验证辅助函数
//!
//! - ensure_store_id：门店 ID 非空（去除首尾空白后）

use crate::error::StorageError;

/// 验证门店 ID 非空
pub fn ensure_store_id(store_id: &str) -> Result<(), StorageError> {
    if store_id.trim().is_empty() {
        return Err(StorageError::new("store_id required"));
    }
    Ok(())
}
