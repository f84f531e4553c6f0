//! 모니터링 데이터소스.
//!
//! 호스트가 호출하는 세 가지 진입점(쿼리, 헬스 체크, 종료)을 묶는다.

use cloudmon_core::config::{ClientConfig, DatasourceSettings, SecureSettings};
use cloudmon_core::error::CoreError;
use cloudmon_core::models::health::CheckHealthResult;
use cloudmon_core::models::query::{QueryDataRequest, QueryDataResponse};
use cloudmon_core::ports::metrics_reader::MetricsReader;
use cloudmon_network::client_builder::MetricsClientBuilder;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Span};

use crate::dispatcher::QueryDispatcher;

/// 기본 종료 타임아웃
const DEFAULT_DISPOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// 모니터링 데이터소스 인스턴스
pub struct MonitoringDatasource {
    reader: Arc<dyn MetricsReader>,
    dispatcher: QueryDispatcher,
    dispose_timeout: Duration,
    span: Span,
}

impl MonitoringDatasource {
    /// 설정으로부터 인스턴스 생성
    ///
    /// 자격 증명 파싱이나 엔드포인트 탐색이 실패하면 인스턴스를 만들지 않는다.
    pub async fn new(
        settings: DatasourceSettings,
        secure: SecureSettings,
        config: ClientConfig,
    ) -> Result<Self, CoreError> {
        let folder_id = settings.folder_id.clone();
        let concurrency = config.query_concurrency;
        let dispose_timeout = config.dispose_timeout();

        let client = MetricsClientBuilder::new(settings, secure, config)
            .build()
            .await?;

        Ok(Self::from_reader(Arc::new(client), folder_id)
            .with_concurrency(concurrency)
            .with_dispose_timeout(dispose_timeout))
    }

    /// 이미 구성된 리더로 인스턴스 생성
    pub fn from_reader(reader: Arc<dyn MetricsReader>, folder_id: impl Into<String>) -> Self {
        let dispatcher = QueryDispatcher::new(reader.clone(), folder_id);
        let span = tracing::info_span!("monitoring_datasource", folder_id = %dispatcher.folder_id());
        Self {
            reader,
            dispatcher: dispatcher.with_span(span.clone()),
            dispose_timeout: DEFAULT_DISPOSE_TIMEOUT,
            span,
        }
    }

    /// 로깅 스팬 지정 (디스패처에도 적용)
    pub fn with_span(mut self, span: Span) -> Self {
        self.dispatcher = self.dispatcher.with_span(span.clone());
        self.span = span;
        self
    }

    /// 배치 내 동시 읽기 수
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.dispatcher = self.dispatcher.with_concurrency(concurrency);
        self
    }

    /// 종료 타임아웃
    pub fn with_dispose_timeout(mut self, timeout: Duration) -> Self {
        self.dispose_timeout = timeout;
        self
    }

    /// 기본 폴더 ID
    pub fn folder_id(&self) -> &str {
        self.dispatcher.folder_id()
    }

    /// 쿼리 배치 처리
    pub async fn query_data(
        &self,
        request: &QueryDataRequest,
    ) -> Result<QueryDataResponse, CoreError> {
        self.dispatcher.query_data(request).await
    }

    /// 헬스 체크 — 토큰 발급과 API 도달 여부 확인
    pub async fn check_health(&self) -> CheckHealthResult {
        match self.reader.check_health().await {
            Ok(()) => CheckHealthResult::ok(),
            Err(e) => {
                warn!(parent: &self.span, "헬스 체크 실패: {e}");
                CheckHealthResult::error(e.to_string())
            }
        }
    }

    /// 인스턴스 종료 — 에러는 로그로만 남긴다
    pub async fn dispose(&self) {
        match tokio::time::timeout(self.dispose_timeout, self.reader.shutdown()).await {
            Ok(Ok(())) => info!(parent: &self.span, "데이터소스 종료 완료"),
            Ok(Err(e)) => error!(parent: &self.span, "데이터소스 종료 실패: {e}"),
            Err(_) => error!(
                parent: &self.span,
                "데이터소스 종료 타임아웃 ({}ms)",
                self.dispose_timeout.as_millis()
            ),
        }
    }
}
