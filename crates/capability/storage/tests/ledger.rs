use domain::StoreStatus;
use storewatch_storage::{InMemoryStoreLedger, StaleStore, StoreLedger};

#[tokio::test]
async fn first_heartbeat_creates_online_record() {
    let ledger = InMemoryStoreLedger::new();
    let record = ledger
        .upsert_heartbeat("loja-1", 1_000)
        .await
        .expect("upsert");
    assert_eq!(record.store_id, "loja-1");
    assert_eq!(record.last_ping_ms, Some(1_000));
    assert_eq!(record.status, StoreStatus::Online);

    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all.len(), 1);
}

#[tokio::test]
async fn repeated_heartbeats_keep_single_record_with_max_ts() {
    let ledger = InMemoryStoreLedger::new();
    for ts_ms in [1_000, 2_000, 2_000, 3_500] {
        ledger
            .upsert_heartbeat("loja-1", ts_ms)
            .await
            .expect("upsert");
    }
    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].last_ping_ms, Some(3_500));
    assert_eq!(all[0].status, StoreStatus::Online);
}

#[tokio::test]
async fn older_heartbeat_does_not_rewind_last_ping() {
    let ledger = InMemoryStoreLedger::new();
    ledger.upsert_heartbeat("loja-1", 5_000).await.expect("upsert");
    let record = ledger
        .upsert_heartbeat("loja-1", 4_000)
        .await
        .expect("upsert");
    assert_eq!(record.last_ping_ms, Some(5_000));
}

#[tokio::test]
async fn empty_store_id_rejected() {
    let ledger = InMemoryStoreLedger::new();
    assert!(ledger.upsert_heartbeat("  ", 1_000).await.is_err());
    assert!(ledger.read_all().await.expect("read all").is_empty());
}

#[tokio::test]
async fn read_stale_selects_online_rows_older_than_threshold() {
    let ledger = InMemoryStoreLedger::new();
    ledger.upsert_heartbeat("fresh", 10_000).await.expect("upsert");
    ledger.upsert_heartbeat("stale", 1_000).await.expect("upsert");
    ledger.upsert_heartbeat("edge", 5_000).await.expect("upsert");
    ledger.seed("never", None, StoreStatus::Online);
    ledger.seed("gone", Some(0), StoreStatus::Offline);

    let stale = ledger.read_stale(5_000).await.expect("read stale");
    assert_eq!(
        stale,
        vec![
            StaleStore {
                store_id: "never".to_string(),
                last_ping_ms: None,
            },
            StaleStore {
                store_id: "stale".to_string(),
                last_ping_ms: Some(1_000),
            },
        ]
    );
}

#[tokio::test]
async fn mark_offline_is_idempotent() {
    let ledger = InMemoryStoreLedger::new();
    ledger.upsert_heartbeat("loja-1", 1_000).await.expect("upsert");

    assert!(ledger.mark_offline("loja-1", 2_000).await.expect("mark"));
    assert!(!ledger.mark_offline("loja-1", 2_000).await.expect("mark"));
    assert!(!ledger.mark_offline("unknown", 2_000).await.expect("mark"));

    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all[0].status, StoreStatus::Offline);
    assert!(ledger.read_stale(2_000).await.expect("stale").is_empty());
}

#[tokio::test]
async fn mark_offline_skips_store_refreshed_after_scan() {
    let ledger = InMemoryStoreLedger::new();
    ledger.upsert_heartbeat("loja-1", 1_000).await.expect("upsert");
    let stale = ledger.read_stale(2_000).await.expect("stale");
    assert_eq!(stale.len(), 1);

    ledger.upsert_heartbeat("loja-1", 2_500).await.expect("upsert");
    assert!(!ledger.mark_offline("loja-1", 2_000).await.expect("mark"));
    let all = ledger.read_all().await.expect("read all");
    assert_eq!(all[0].status, StoreStatus::Online);
}

#[tokio::test]
async fn heartbeat_resurrects_offline_store() {
    let ledger = InMemoryStoreLedger::new();
    ledger.upsert_heartbeat("loja-1", 1_000).await.expect("upsert");
    ledger.mark_offline("loja-1", 2_000).await.expect("mark");
    let record = ledger
        .upsert_heartbeat("loja-1", 3_000)
        .await
        .expect("upsert");
    assert_eq!(record.status, StoreStatus::Online);
    assert_eq!(record.last_ping_ms, Some(3_000));
}

#[tokio::test]
async fn read_all_on_empty_ledger_is_empty() {
    let ledger = InMemoryStoreLedger::new();
    assert!(ledger.read_all().await.expect("read all").is_empty());
}
