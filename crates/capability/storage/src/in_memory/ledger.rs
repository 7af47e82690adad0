//! 门店台账内存实现（用于测试与本地演示）。

use crate::error::StorageError;
use crate::models::{StaleStore, StoreRecord};
use crate::traits::StoreLedger;
use crate::validation::ensure_store_id;
use domain::StoreStatus;
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Clone, Copy)]
struct Entry {
    last_ping_ms: Option<i64>,
    status: StoreStatus,
}

/// 基于 `RwLock<BTreeMap>` 的台账，写锁覆盖整个读改写过程。
pub struct InMemoryStoreLedger {
    stores: RwLock<BTreeMap<String, Entry>>,
}

impl InMemoryStoreLedger {
    pub fn new() -> Self {
        Self {
            stores: RwLock::new(BTreeMap::new()),
        }
    }

    /// 预置一条记录（测试用：例如模拟 `ultimo_ping` 为空的历史数据）。
    pub fn seed(&self, store_id: &str, last_ping_ms: Option<i64>, status: StoreStatus) {
        if let Ok(mut map) = self.stores.write() {
            map.insert(
                store_id.to_string(),
                Entry {
                    last_ping_ms,
                    status,
                },
            );
        }
    }
}

impl Default for InMemoryStoreLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn to_record(store_id: &str, entry: &Entry) -> StoreRecord {
    StoreRecord {
        store_id: store_id.to_string(),
        last_ping_ms: entry.last_ping_ms,
        status: entry.status,
    }
}

#[async_trait::async_trait]
impl StoreLedger for InMemoryStoreLedger {
    async fn upsert_heartbeat(
        &self,
        store_id: &str,
        ts_ms: i64,
    ) -> Result<StoreRecord, StorageError> {
        ensure_store_id(store_id)?;
        let mut map = self
            .stores
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let entry = map.entry(store_id.to_string()).or_insert(Entry {
            last_ping_ms: None,
            status: StoreStatus::Online,
        });
        entry.last_ping_ms = Some(entry.last_ping_ms.map_or(ts_ms, |prev| prev.max(ts_ms)));
        entry.status = StoreStatus::Online;
        Ok(to_record(store_id, entry))
    }

    async fn read_all(&self) -> Result<Vec<StoreRecord>, StorageError> {
        let map = self
            .stores
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .iter()
            .map(|(store_id, entry)| to_record(store_id, entry))
            .collect())
    }

    async fn read_stale(&self, threshold_ms: i64) -> Result<Vec<StaleStore>, StorageError> {
        let map = self
            .stores
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map
            .iter()
            .filter(|(_, entry)| {
                entry.status.is_online() && StaleStore::is_stale(entry.last_ping_ms, threshold_ms)
            })
            .map(|(store_id, entry)| StaleStore {
                store_id: store_id.clone(),
                last_ping_ms: entry.last_ping_ms,
            })
            .collect())
    }

    async fn mark_offline(
        &self,
        store_id: &str,
        stale_before_ms: i64,
    ) -> Result<bool, StorageError> {
        let mut map = self
            .stores
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let Some(entry) = map.get_mut(store_id) else {
            return Ok(false);
        };
        if !entry.status.is_online() || !StaleStore::is_stale(entry.last_ping_ms, stale_before_ms) {
            return Ok(false);
        }
        entry.status = StoreStatus::Offline;
        Ok(true)
    }
}
