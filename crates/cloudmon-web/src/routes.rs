//! API 라우트 정의.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

/// API 라우트 생성
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/query", post(handlers::query::query_data))
        .route("/health", get(handlers::health::check_health))
}
