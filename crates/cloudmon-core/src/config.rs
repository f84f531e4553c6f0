//! 데이터소스 설정 구조체.
//!
//! 호스트가 넘겨주는 공개 설정(JSON), 복호화된 비밀 설정,
//! 클라이언트 타임아웃/재시도 정책, 웹 어댑터 설정을 정의한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 데이터소스 공개 설정
    #[serde(default)]
    pub datasource: DatasourceSettings,
    /// 비밀 설정 (서비스 계정 키)
    #[serde(default)]
    pub secure: SecureSettings,
    /// 클라이언트 타임아웃/재시도 정책
    #[serde(default)]
    pub client: ClientConfig,
    /// 웹 어댑터 설정
    #[serde(default)]
    pub web: WebConfig,
}

impl AppConfig {
    /// 기본 설정 생성
    pub fn default_config() -> Self {
        Self::default()
    }
}

// ============================================================
// 데이터소스 설정
// ============================================================

/// 데이터소스 공개 설정 — 호스트의 인스턴스 설정 JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasourceSettings {
    /// 클라우드 API 엔드포인트 (엔드포인트 탐색에 사용)
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// 모니터링 엔드포인트 직접 지정 (비어 있으면 탐색)
    #[serde(default)]
    pub monitoring_endpoint: String,
    /// 기본 폴더 ID (스코프)
    #[serde(default)]
    pub folder_id: String,
    /// IAM 토큰 교환 엔드포인트
    #[serde(default = "default_iam_endpoint")]
    pub iam_endpoint: String,
    /// 인스턴스 메타데이터 엔드포인트 (서비스 계정 키가 없을 때 사용)
    #[serde(default = "default_metadata_endpoint")]
    pub metadata_endpoint: String,
}

impl Default for DatasourceSettings {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            monitoring_endpoint: String::new(),
            folder_id: String::new(),
            iam_endpoint: default_iam_endpoint(),
            metadata_endpoint: default_metadata_endpoint(),
        }
    }
}

impl DatasourceSettings {
    /// 호스트 설정 JSON 파싱
    pub fn from_json(raw: &[u8]) -> Result<Self, CoreError> {
        serde_json::from_slice(raw)
            .map_err(|e| CoreError::Config(format!("플러그인 설정 파싱 실패: {e}")))
    }
}

/// 복호화된 비밀 설정
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecureSettings {
    /// 서비스 계정 키 JSON (없으면 인스턴스 서비스 계정 사용)
    #[serde(default)]
    pub api_key_json: Option<String>,
}

impl SecureSettings {
    /// 비어 있지 않은 키 JSON만 반환
    pub fn key_json(&self) -> Option<&str> {
        self.api_key_json
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

// ============================================================
// 클라이언트 정책
// ============================================================

/// 클라이언트 타임아웃/재시도 정책
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// 토큰 교환 타임아웃 (밀리초)
    #[serde(default = "default_token_timeout_ms")]
    pub token_timeout_ms: u64,
    /// 엔드포인트 탐색 타임아웃 (밀리초)
    #[serde(default = "default_discovery_timeout_ms")]
    pub discovery_timeout_ms: u64,
    /// 읽기 요청 전체 타임아웃 (밀리초, 재시도 포함)
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// 전송 실패 시 최대 재시도 횟수
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// 종료 타임아웃 (밀리초)
    #[serde(default = "default_dispose_timeout_ms")]
    pub dispose_timeout_ms: u64,
    /// 토큰 만료 전 갱신 여유 (초)
    #[serde(default = "default_token_refresh_margin_secs")]
    pub token_refresh_margin_secs: u64,
    /// 배치 내 동시 읽기 수 (1 = 순차)
    #[serde(default = "default_query_concurrency")]
    pub query_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_timeout_ms: default_token_timeout_ms(),
            discovery_timeout_ms: default_discovery_timeout_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            max_retries: default_max_retries(),
            dispose_timeout_ms: default_dispose_timeout_ms(),
            token_refresh_margin_secs: default_token_refresh_margin_secs(),
            query_concurrency: default_query_concurrency(),
        }
    }
}

impl ClientConfig {
    /// 토큰 교환 타임아웃
    pub fn token_timeout(&self) -> Duration {
        Duration::from_millis(self.token_timeout_ms)
    }

    /// 엔드포인트 탐색 타임아웃
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(self.discovery_timeout_ms)
    }

    /// 읽기 요청 타임아웃
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// 종료 타임아웃
    pub fn dispose_timeout(&self) -> Duration {
        Duration::from_millis(self.dispose_timeout_ms)
    }

    /// 토큰 갱신 여유
    pub fn token_refresh_margin(&self) -> Duration {
        Duration::from_secs(self.token_refresh_margin_secs)
    }
}

// ============================================================
// 웹 어댑터 설정
// ============================================================

/// 웹 어댑터 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    /// 포트 번호
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// 외부 접근 허용 (false면 127.0.0.1에만 바인드)
    #[serde(default)]
    pub allow_external: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: default_web_port(),
            allow_external: false,
        }
    }
}

fn default_api_endpoint() -> String {
    "api.cloud.yandex.net:443".to_string()
}
fn default_iam_endpoint() -> String {
    "https://iam.api.cloud.yandex.net".to_string()
}
fn default_metadata_endpoint() -> String {
    "http://169.254.169.254".to_string()
}
fn default_token_timeout_ms() -> u64 {
    3_000
}
fn default_discovery_timeout_ms() -> u64 {
    10_000
}
fn default_request_timeout_ms() -> u64 {
    30_000
}
fn default_max_retries() -> u32 {
    3
}
fn default_dispose_timeout_ms() -> u64 {
    5_000
}
fn default_token_refresh_margin_secs() -> u64 {
    300
}
fn default_query_concurrency() -> usize {
    1
}
fn default_web_port() -> u16 {
    3300
}
