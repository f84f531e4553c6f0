//! 모니터링 읽기 API 클라이언트.
//!
//! `MetricsReader` 포트 구현. 베어러 토큰 + `folderId` 스코프 주입,
//! 전송 실패 재시도, 호출 전체 데드라인 적용.

use async_trait::async_trait;
use cloudmon_core::error::CoreError;
use cloudmon_core::models::metrics::{MetricsRequest, MetricsResponse};
use cloudmon_core::ports::metrics_reader::MetricsReader;
use cloudmon_core::ports::token_provider::TokenProvider;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::endpoint::Endpoint;

/// 기본 재시도 횟수
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// 첫 재시도 대기
const INITIAL_BACKOFF: Duration = Duration::from_millis(100);

/// 최대 재시도 대기
const MAX_BACKOFF: Duration = Duration::from_secs(2);

/// 폴더 스코프 쿼리 파라미터
const FOLDER_ID_PARAM: &str = "folderId";

/// 재시도 가능한 에러인지 판별 (전송 계층 실패만)
fn is_retryable(error: &CoreError) -> bool {
    matches!(error, CoreError::Network(_))
}

/// 모니터링 읽기 클라이언트 — `MetricsReader` 포트 구현
pub struct HttpMetricsClient {
    client: RwLock<Option<reqwest::Client>>,
    endpoint: Endpoint,
    token_provider: Arc<dyn TokenProvider>,
    request_timeout: Duration,
    max_retries: u32,
}

impl HttpMetricsClient {
    /// 새 클라이언트 생성
    pub fn new(
        endpoint: Endpoint,
        token_provider: Arc<dyn TokenProvider>,
        request_timeout: Duration,
    ) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {}", e)))?;

        Ok(Self {
            client: RwLock::new(Some(client)),
            endpoint,
            token_provider,
            request_timeout,
            max_retries: DEFAULT_MAX_RETRIES,
        })
    }

    /// 재시도 횟수 설정
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// 읽기 엔드포인트
    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// 종료 여부
    pub fn is_closed(&self) -> bool {
        self.client.read().is_none()
    }

    /// 풀링된 HTTP 클라이언트 (종료 후에는 에러)
    fn http(&self) -> Result<reqwest::Client, CoreError> {
        self.client
            .read()
            .clone()
            .ok_or_else(|| CoreError::Internal("client closed".to_string()))
    }

    /// 응답 상태 코드 확인 — 400 이상은 상태 코드를 담은 에러
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();
        if status.as_u16() < 400 {
            return Ok(resp);
        }

        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        debug!("모니터링 API 에러 응답 ({status}): {text}");
        Err(CoreError::Remote {
            status: status.as_u16(),
        })
    }

    /// 재시도가 포함된 요청 실행
    ///
    /// 전송 실패만 재시도하며 (100ms → 200ms → … 최대 2s),
    /// 재시도를 포함한 전체 호출은 요청 타임아웃 데드라인을 넘지 않는다.
    async fn execute_with_retry<F, Fut, T>(&self, operation: F) -> Result<T, CoreError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let deadline = Instant::now() + self.request_timeout;
        let mut delay = INITIAL_BACKOFF;

        for attempt in 0..=self.max_retries {
            let result = tokio::time::timeout_at(deadline, operation())
                .await
                .map_err(|_| CoreError::Timeout {
                    timeout_ms: self.request_timeout.as_millis() as u64,
                })?;

            let err = match result {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !is_retryable(&err) || attempt == self.max_retries {
                return Err(err);
            }
            if Instant::now() + delay >= deadline {
                warn!("데드라인 임박, 재시도 중단: {err}");
                return Err(err);
            }

            warn!(
                "요청 실패 (시도 {}/{}): {err}, {delay:?} 후 재시도",
                attempt + 1,
                self.max_retries + 1
            );
            tokio::time::sleep(delay).await;
            delay = (delay * 2).min(MAX_BACKOFF);
        }

        Err(CoreError::Internal("요청 실패".to_string()))
    }
}

#[async_trait]
impl MetricsReader for HttpMetricsClient {
    async fn read(
        &self,
        folder_id: &str,
        request: &MetricsRequest,
    ) -> Result<MetricsResponse, CoreError> {
        let token = self.token_provider.get_token(true).await?;
        let http = self.http()?;

        let mut url = self.endpoint.url().clone();
        url.query_pairs_mut().append_pair(FOLDER_ID_PARAM, folder_id);
        debug!(
            "메트릭 읽기: folder_id={folder_id}, aggregation={}",
            request.downsampling.grid_aggregation
        );

        self.execute_with_retry(|| async {
            let resp = http
                .post(url.clone())
                .bearer_auth(&token)
                .json(request)
                .send()
                .await
                .map_err(|e| CoreError::Network(format!("metrics read: {e}")))?;

            let resp = self.check_response(resp).await?;
            resp.json::<MetricsResponse>()
                .await
                .map_err(|e| CoreError::Internal(format!("metrics read: 응답 파싱 실패: {e}")))
        })
        .await
    }

    async fn check_health(&self) -> Result<(), CoreError> {
        let token = self.token_provider.get_token(true).await?;
        let http = self.http()?;

        let resp = http
            .head(self.endpoint.url().clone())
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("api check: {e}")))?;

        debug!("API 확인 응답: {}", resp.status());
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), CoreError> {
        if self.client.write().take().is_some() {
            info!("모니터링 클라이언트 연결 해제");
        }
        Ok(())
    }
}
