//! 单元测试共用的替身：记录型告警通道与总是失败的台账。

use async_trait::async_trait;
use std::sync::Mutex;
use storewatch_notify::{Notifier, NotifyError};
use storewatch_storage::{StaleStore, StorageError, StoreLedger, StoreRecord};

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().expect("lock").clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.sent.lock().expect("lock").push(text.to_string());
        Ok(())
    }
}

pub struct BrokenLedger;

#[async_trait]
impl StoreLedger for BrokenLedger {
    async fn upsert_heartbeat(
        &self,
        _store_id: &str,
        _ts_ms: i64,
    ) -> Result<StoreRecord, StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn read_all(&self) -> Result<Vec<StoreRecord>, StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn read_stale(&self, _threshold_ms: i64) -> Result<Vec<StaleStore>, StorageError> {
        Err(StorageError::new("connection refused"))
    }

    async fn mark_offline(
        &self,
        _store_id: &str,
        _stale_before_ms: i64,
    ) -> Result<bool, StorageError> {
        Err(StorageError::new("connection refused"))
    }
}
