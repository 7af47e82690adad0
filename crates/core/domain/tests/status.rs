use domain::{StoreStatus, format_iso8601, format_local};

#[test]
fn status_round_trips_through_str() {
    assert_eq!("online".parse::<StoreStatus>(), Ok(StoreStatus::Online));
    assert_eq!(" OFFLINE ".parse::<StoreStatus>(), Ok(StoreStatus::Offline));
    assert_eq!(StoreStatus::Offline.as_str(), "offline");
    assert!(StoreStatus::Online.is_online());
}

#[test]
fn unknown_status_rejected() {
    let err = "degraded".parse::<StoreStatus>().expect_err("unknown");
    assert_eq!(err.0, "degraded");
}

#[test]
fn iso8601_matches_epoch() {
    assert_eq!(format_iso8601(0).as_deref(), Some("1970-01-01T00:00:00.000Z"));
    assert_eq!(
        format_iso8601(1_700_000_000_123).as_deref(),
        Some("2023-11-14T22:13:20.123Z")
    );
}

#[test]
fn local_format_present_for_valid_ts() {
    let rendered = format_local(1_700_000_000_000).expect("local");
    assert_eq!(rendered.len(), "14/11/2023 22:13:20".len());
    assert!(format_local(i64::MAX).is_none());
}
