//! HTTP 响应辅助函数
//!
//! 失败响应统一为 `{ "error": "..." }`，状态码与错误类别对应：
//! - 校验失败：400
//! - 台账读写失败：500

use api_contract::ErrorBody;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
}

/// 内部错误响应（不向调用方暴露底层原因）
pub fn internal_error(message: impl Into<String>) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}
