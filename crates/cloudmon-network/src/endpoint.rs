//! 모니터링 엔드포인트 결정.
//!
//! 설정에 직접 지정된 호스트가 있으면 그대로 쓰고, 없으면 API 엔드포인트
//! 탐색 서비스에 `monitoring` 주소를 한 번 질의한다.

use cloudmon_core::error::CoreError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// 모니터링 서비스 식별자
pub const MONITORING_ENDPOINT_ID: &str = "monitoring";

/// 메트릭 읽기 경로 (고정)
pub const READ_PATH: &str = "/monitoring/v2/data/read";

/// 엔드포인트 탐색 경로
const DISCOVERY_PATH: &str = "/endpoints/v1/endpoints";

/// 기본 탐색 타임아웃
const DEFAULT_DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// 탐색 응답
#[derive(Debug, Deserialize)]
struct ApiEndpointResponse {
    #[serde(default)]
    id: String,
    address: String,
}

/// 엔드포인트 문자열을 URL로 변환
///
/// 스킴이 없으면 `https://`를 붙이고, 명시된 스킴은 유지한다.
pub fn base_url(endpoint: &str) -> Result<Url, CoreError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() {
        return Err(CoreError::Config("엔드포인트가 비어 있음".to_string()));
    }
    let raw = if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("https://{endpoint}")
    };
    Url::parse(&raw).map_err(|e| CoreError::Config(format!("잘못된 엔드포인트 {endpoint:?}: {e}")))
}

/// 메트릭 읽기 API 기본 URL — 생성 후 변경되지 않는다
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// 호스트로부터 `https://{host}/monitoring/v2/data/read` 구성
    pub fn from_host(host: &str) -> Result<Self, CoreError> {
        let mut url = base_url(host)?;
        url.set_path(READ_PATH);
        url.set_query(None);
        Ok(Self { url })
    }

    /// 전체 URL
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL 문자열
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

/// 엔드포인트 결정기
pub struct EndpointResolver {
    client: reqwest::Client,
    api_endpoint: String,
    timeout: Duration,
}

impl EndpointResolver {
    /// 새 결정기 생성
    pub fn new(api_endpoint: &str) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            api_endpoint: api_endpoint.to_string(),
            timeout: DEFAULT_DISCOVERY_TIMEOUT,
        })
    }

    /// 탐색 타임아웃 설정
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 엔드포인트 결정 — 재지정 값이 비어 있지 않으면 탐색하지 않는다
    pub async fn resolve(&self, monitoring_override: &str) -> Result<Endpoint, CoreError> {
        let host = match monitoring_override.trim() {
            "" => self.discover(MONITORING_ENDPOINT_ID).await?,
            explicit => {
                debug!("모니터링 엔드포인트 직접 지정: {explicit}");
                explicit.to_string()
            }
        };

        let endpoint = Endpoint::from_host(&host)?;
        info!("모니터링 엔드포인트: {}", endpoint.as_str());
        Ok(endpoint)
    }

    /// 탐색 서비스에 서비스 주소 질의
    pub async fn discover(&self, endpoint_id: &str) -> Result<String, CoreError> {
        let base = base_url(&self.api_endpoint)
            .map_err(|e| CoreError::Discovery(format!("monitoring endpoint discovery: {e}")))?;
        let url = format!(
            "{}{DISCOVERY_PATH}/{endpoint_id}",
            base.as_str().trim_end_matches('/')
        );
        debug!("엔드포인트 탐색 요청: {url}");

        let request = async {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| CoreError::Discovery(format!("monitoring endpoint discovery: {e}")))?;

            if !resp.status().is_success() {
                return Err(CoreError::Discovery(format!(
                    "monitoring endpoint discovery: bad http status: {}",
                    resp.status().as_u16()
                )));
            }

            resp.json::<ApiEndpointResponse>().await.map_err(|e| {
                CoreError::Discovery(format!("monitoring endpoint discovery: 응답 파싱 실패: {e}"))
            })
        };

        let found = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| {
                CoreError::Discovery(format!(
                    "monitoring endpoint discovery: 타임아웃 ({}ms)",
                    self.timeout.as_millis()
                ))
            })??;

        if found.address.trim().is_empty() {
            return Err(CoreError::Discovery(format!(
                "monitoring endpoint discovery: {} 주소가 비어 있음",
                found.id
            )));
        }
        Ok(found.address)
    }
}
