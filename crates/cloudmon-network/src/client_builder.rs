//! 메트릭 클라이언트 조립.
//!
//! 자격 증명 → 토큰 제공자 → 엔드포인트 → 읽기 클라이언트 순서로
//! 생성자 주입하여 연결한다. 어느 단계든 실패하면 클라이언트는 만들어지지 않는다.

use cloudmon_core::config::{ClientConfig, DatasourceSettings, SecureSettings};
use cloudmon_core::error::CoreError;
use cloudmon_core::models::credentials::Credentials;
use std::sync::Arc;
use tracing::info;

use crate::auth::IamTokenProvider;
use crate::endpoint::EndpointResolver;
use crate::metrics_client::HttpMetricsClient;

/// 메트릭 클라이언트 빌더
pub struct MetricsClientBuilder {
    settings: DatasourceSettings,
    secure: SecureSettings,
    config: ClientConfig,
}

impl MetricsClientBuilder {
    /// 새 빌더 생성
    pub fn new(settings: DatasourceSettings, secure: SecureSettings, config: ClientConfig) -> Self {
        Self {
            settings,
            secure,
            config,
        }
    }

    /// 토큰 제공자만 생성 (네트워크 호출 없음)
    pub fn token_provider(&self) -> Result<IamTokenProvider, CoreError> {
        let credentials = Credentials::from_key_json(self.secure.key_json())?;
        Ok(IamTokenProvider::new(
            &credentials,
            &self.settings.iam_endpoint,
            &self.settings.metadata_endpoint,
        )?
        .with_timeout(self.config.token_timeout())
        .with_refresh_margin(self.config.token_refresh_margin()))
    }

    /// 클라이언트 생성 — 엔드포인트 탐색은 여기서 한 번만 수행
    pub async fn build(self) -> Result<HttpMetricsClient, CoreError> {
        let token_provider = Arc::new(self.token_provider()?);

        let endpoint = EndpointResolver::new(&self.settings.api_endpoint)?
            .with_timeout(self.config.discovery_timeout())
            .resolve(&self.settings.monitoring_endpoint)
            .await?;

        info!(
            "모니터링 클라이언트 생성: endpoint={}, service_account_key={}",
            endpoint.as_str(),
            token_provider.uses_service_account_key()
        );

        Ok(
            HttpMetricsClient::new(endpoint, token_provider, self.config.request_timeout())?
                .with_max_retries(self.config.max_retries),
        )
    }
}
