//! 헬스 체크 핸들러.

use axum::extract::State;
use axum::Json;
use cloudmon_core::models::health::CheckHealthResult;

use crate::AppState;

/// GET /api/health — 결과는 본문의 상태로 전달하며 항상 200
pub async fn check_health(State(state): State<AppState>) -> Json<CheckHealthResult> {
    Json(state.datasource.check_health().await)
}
