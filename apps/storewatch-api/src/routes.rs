//! 路由定义
//!
//! - 健康检查：/health
//! - 心跳接入：POST /heartbeat
//! - 状态查询：GET /status
//! - 计数器：GET /metrics

use super::AppState;
use super::handlers::*;
use super::middleware::request_context;
use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/heartbeat", post(post_heartbeat))
        .route("/status", get(get_status))
        .route("/metrics", get(get_metrics))
}

/// 装配完整应用：handler panic 转为 500，外层注入 request_id/trace_id。
pub fn build_app(state: AppState) -> Router {
    create_api_router()
        .with_state(state)
        .layer(CatchPanicLayer::new())
        .layer(middleware::from_fn(request_context))
}
