//! 메트릭 읽기 클라이언트 포트.
//!
//! 구현: `cloudmon-network::metrics_client::HttpMetricsClient`

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::metrics::{MetricsRequest, MetricsResponse};

/// 메트릭 읽기 클라이언트
#[async_trait]
pub trait MetricsReader: Send + Sync {
    /// 폴더 스코프로 메트릭 읽기
    ///
    /// 에러 시 부분 결과는 반환하지 않는다.
    async fn read(
        &self,
        folder_id: &str,
        request: &MetricsRequest,
    ) -> Result<MetricsResponse, CoreError>;

    /// API 도달 가능 여부 확인
    async fn check_health(&self) -> Result<(), CoreError>;

    /// 보유한 연결 해제
    async fn shutdown(&self) -> Result<(), CoreError>;
}
