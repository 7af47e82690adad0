use async_trait::async_trait;
use domain::StoreStatus;
use std::sync::{Arc, Mutex};
use storewatch_ingest::{HeartbeatIngest, IngestError};
use storewatch_notify::{Notifier, NotifyError};
use storewatch_storage::{
    InMemoryStoreLedger, StaleStore, StorageError, StoreLedger, StoreRecord,
};

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<String> {
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

struct BrokenLedger;

#[async_trait]
impl StoreLedger for BrokenLedger {
    async fn upsert_heartbeat(
        &self,
        _store_id: &str,
        _ts_ms: i64,
    ) -> Result<StoreRecord, StorageError> {
        Err(StorageError::new("database is locked"))
    }

    async fn read_all(&self) -> Result<Vec<StoreRecord>, StorageError> {
        Err(StorageError::new("database is locked"))
    }

    async fn read_stale(&self, _threshold_ms: i64) -> Result<Vec<StaleStore>, StorageError> {
        Err(StorageError::new("database is locked"))
    }

    async fn mark_offline(
        &self,
        _store_id: &str,
        _stale_before_ms: i64,
    ) -> Result<bool, StorageError> {
        Err(StorageError::new("database is locked"))
    }
}

#[tokio::test]
async fn heartbeat_promotes_store_online() {
    let ledger = Arc::new(InMemoryStoreLedger::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let ingest = HeartbeatIngest::new(ledger.clone(), notifier.clone());

    let record = ingest.record(Some("loja-1"), 1_000).await.expect("record");
    assert_eq!(record.status, StoreStatus::Online);
    assert_eq!(record.last_ping_ms, Some(1_000));
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn missing_or_blank_id_is_validation_error_without_write() {
    let ledger = Arc::new(InMemoryStoreLedger::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let ingest = HeartbeatIngest::new(ledger.clone(), notifier.clone());

    for store_id in [None, Some(""), Some("   ")] {
        let err = ingest.record(store_id, 1_000).await.expect_err("invalid");
        assert!(matches!(err, IngestError::Validation(_)));
    }
    assert!(ledger.read_all().await.expect("read all").is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn storage_failure_escalates_to_notifier() {
    let notifier = Arc::new(RecordingNotifier::default());
    let ingest = HeartbeatIngest::new(Arc::new(BrokenLedger), notifier.clone());

    let err = ingest.record(Some("loja-9"), 1_000).await.expect_err("storage");
    assert!(matches!(err, IngestError::Storage(_)));
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0],
        "🔴 ERRO! Falha ao processar heartbeat para loja loja-9: database is locked"
    );
}

#[tokio::test]
async fn repeated_pings_are_idempotent() {
    let ledger = Arc::new(InMemoryStoreLedger::new());
    let ingest = HeartbeatIngest::new(ledger.clone(), Arc::new(RecordingNotifier::default()));

    for ts_ms in [1_000, 1_000, 2_000] {
        ingest.record(Some("loja-1"), ts_ms).await.expect("record");
    }
    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].last_ping_ms, Some(2_000));
}

#[tokio::test]
async fn store_id_is_recorded_as_sent() {
    let ledger = Arc::new(InMemoryStoreLedger::new());
    let ingest = HeartbeatIngest::new(ledger.clone(), Arc::new(RecordingNotifier::default()));

    let padded = ingest.record(Some(" loja-1 "), 1_000).await.expect("record");
    assert_eq!(padded.store_id, " loja-1 ");
    ingest.record(Some("loja-1"), 2_000).await.expect("record");

    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all.len(), 2);
    assert!(all.iter().any(|record| record.store_id == " loja-1 "));
    assert!(all.iter().any(|record| record.store_id == "loja-1"));
}
