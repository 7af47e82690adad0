//! 进程内计数器快照。
//!
//! - GET /metrics

use api_contract::MetricsSnapshotDto;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storewatch_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(MetricsSnapshotDto {
            heartbeats_accepted: snapshot.heartbeats_accepted,
            heartbeats_rejected: snapshot.heartbeats_rejected,
            heartbeats_failed: snapshot.heartbeats_failed,
            cycles_run: snapshot.cycles_run,
            stores_demoted: snapshot.stores_demoted,
            demotion_failures: snapshot.demotion_failures,
            notifications_sent: snapshot.notifications_sent,
            notifications_failed: snapshot.notifications_failed,
        }),
    )
        .into_response()
}
