//! 쿼리 배치 핸들러.

use axum::extract::State;
use axum::Json;
use cloudmon_core::models::query::{QueryDataRequest, QueryDataResponse};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// POST /api/query
pub async fn query_data(
    State(state): State<AppState>,
    Json(request): Json<QueryDataRequest>,
) -> Result<Json<QueryDataResponse>, ApiError> {
    debug!("쿼리 배치 요청: {}개", request.queries.len());
    let response = state.datasource.query_data(&request).await?;
    Ok(Json(response))
}
