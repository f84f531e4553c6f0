//! IAM 토큰 관리.
//!
//! 서비스 계정 키(JWT 교환) 또는 인스턴스 메타데이터로 IAM 토큰을 얻고,
//! 만료 임박 전까지 캐시한다.

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use cloudmon_core::error::CoreError;
use cloudmon_core::models::credentials::{Credentials, ServiceAccountKey};
use cloudmon_core::ports::token_provider::TokenProvider;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

/// IAM 토큰 교환 경로
const IAM_TOKENS_PATH: &str = "/iam/v1/tokens";

/// 인스턴스 메타데이터 토큰 경로
const METADATA_TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";

/// 기본 토큰 교환 타임아웃
const DEFAULT_TOKEN_TIMEOUT: Duration = Duration::from_secs(3);

/// 기본 갱신 여유 (만료 5분 전)
const DEFAULT_REFRESH_MARGIN: Duration = Duration::from_secs(300);

/// 교환용 JWT 유효 기간 (초)
const JWT_LIFETIME_SECS: i64 = 3600;

/// IAM 응답 — 서비스 계정 JWT 교환
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IamTokenResponse {
    iam_token: String,
    expires_at: DateTime<Utc>,
}

/// 메타데이터 응답 — 인스턴스 서비스 계정
#[derive(Debug, Deserialize)]
struct MetadataTokenResponse {
    access_token: String,
    expires_in: i64,
}

/// 교환용 JWT 클레임
#[derive(Debug, Serialize)]
struct JwtClaims<'a> {
    iss: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

/// 내부 토큰 상태
#[derive(Debug, Clone)]
struct TokenState {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    fn expires_within(&self, now: DateTime<Utc>, margin: ChronoDuration) -> bool {
        now + margin >= self.expires_at
    }
}

/// 서비스 계정 JWT 서명자 (생성 시 개인 키 파싱)
struct JwtSigner {
    key_id: String,
    service_account_id: String,
    encoding_key: EncodingKey,
}

impl JwtSigner {
    fn from_key(key: &ServiceAccountKey) -> Result<Self, CoreError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key_pem().as_bytes())
            .map_err(|e| CoreError::Config(format!("서비스 계정 개인 키 파싱 실패: {e}")))?;
        Ok(Self {
            key_id: key.id.clone(),
            service_account_id: key.service_account_id.clone(),
            encoding_key,
        })
    }

    fn sign(&self, audience: &str, now: DateTime<Utc>) -> Result<String, CoreError> {
        let mut header = Header::new(Algorithm::PS256);
        header.kid = Some(self.key_id.clone());

        let iat = now.timestamp();
        let claims = JwtClaims {
            iss: &self.service_account_id,
            aud: audience,
            iat,
            exp: iat + JWT_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&header, &claims, &self.encoding_key)
            .map_err(|e| CoreError::Auth(format!("get token: JWT 서명 실패: {e}")))
    }
}

/// 토큰 출처
enum TokenSource {
    /// 서비스 계정 키 → JWT → IAM 교환
    ServiceAccount(JwtSigner),
    /// 인스턴스 메타데이터 서비스
    Instance,
}

/// IAM 토큰 제공자 — 교환/캐시/만료 관리
///
/// 캐시 잠금을 교환 동안 유지하므로, 동시에 호출한 쪽들은
/// 하나의 교환 결과를 함께 사용한다.
pub struct IamTokenProvider {
    source: TokenSource,
    iam_tokens_url: String,
    metadata_token_url: String,
    client: reqwest::Client,
    timeout: Duration,
    refresh_margin: ChronoDuration,
    state: Mutex<Option<TokenState>>,
}

impl IamTokenProvider {
    /// 새 토큰 제공자 생성
    ///
    /// 서비스 계정 개인 키를 해석할 수 없으면 `CoreError::Config`.
    pub fn new(
        credentials: &Credentials,
        iam_endpoint: &str,
        metadata_endpoint: &str,
    ) -> Result<Self, CoreError> {
        let source = match credentials {
            Credentials::ServiceAccountKey(key) => {
                TokenSource::ServiceAccount(JwtSigner::from_key(key)?)
            }
            Credentials::InstanceServiceAccount => TokenSource::Instance,
        };

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::Config(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            source,
            iam_tokens_url: format!("{}{IAM_TOKENS_PATH}", iam_endpoint.trim_end_matches('/')),
            metadata_token_url: format!(
                "{}{METADATA_TOKEN_PATH}",
                metadata_endpoint.trim_end_matches('/')
            ),
            client,
            timeout: DEFAULT_TOKEN_TIMEOUT,
            refresh_margin: to_chrono(DEFAULT_REFRESH_MARGIN),
            state: Mutex::new(None),
        })
    }

    /// 토큰 교환 타임아웃 설정
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 만료 전 갱신 여유 설정
    pub fn with_refresh_margin(mut self, margin: Duration) -> Self {
        self.refresh_margin = to_chrono(margin);
        self
    }

    /// 서비스 계정 키 사용 여부
    pub fn uses_service_account_key(&self) -> bool {
        matches!(self.source, TokenSource::ServiceAccount(_))
    }

    /// 캐시된 토큰 폐기
    pub async fn invalidate(&self) {
        let mut state = self.state.lock().await;
        *state = None;
        debug!("캐시된 IAM 토큰 폐기");
    }

    /// 캐시된 토큰이 아직 유효한지 여부
    pub async fn has_valid_token(&self) -> bool {
        let state = self.state.lock().await;
        state.as_ref().is_some_and(|s| !s.is_expired(Utc::now()))
    }

    /// 신원 서비스와 토큰 교환 (타임아웃 적용)
    async fn exchange(&self) -> Result<TokenState, CoreError> {
        let exchange = async {
            match &self.source {
                TokenSource::ServiceAccount(signer) => self.exchange_jwt(signer).await,
                TokenSource::Instance => self.exchange_metadata().await,
            }
        };

        tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| {
                CoreError::Auth(format!(
                    "get token: 토큰 교환 타임아웃 ({}ms)",
                    self.timeout.as_millis()
                ))
            })?
    }

    async fn exchange_jwt(&self, signer: &JwtSigner) -> Result<TokenState, CoreError> {
        let jwt = signer.sign(&self.iam_tokens_url, Utc::now())?;

        let resp = self
            .client
            .post(&self.iam_tokens_url)
            .json(&serde_json::json!({ "jwt": jwt }))
            .send()
            .await
            .map_err(|e| CoreError::Auth(format!("get token: 토큰 교환 요청 실패: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Auth(format!(
                "get token: 토큰 교환 실패 ({status}): {text}"
            )));
        }

        let token_resp: IamTokenResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Auth(format!("get token: 토큰 파싱 실패: {e}")))?;

        Ok(TokenState {
            access_token: token_resp.iam_token,
            expires_at: token_resp.expires_at,
        })
    }

    async fn exchange_metadata(&self) -> Result<TokenState, CoreError> {
        let resp = self
            .client
            .get(&self.metadata_token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| CoreError::Auth(format!("get token: 메타데이터 요청 실패: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(CoreError::Auth(format!(
                "get token: 메타데이터 토큰 실패 ({status}): {text}"
            )));
        }

        let token_resp: MetadataTokenResponse = resp
            .json()
            .await
            .map_err(|e| CoreError::Auth(format!("get token: 토큰 파싱 실패: {e}")))?;

        Ok(TokenState {
            access_token: token_resp.access_token,
            expires_at: Utc::now() + ChronoDuration::seconds(token_resp.expires_in.max(0)),
        })
    }
}

#[async_trait]
impl TokenProvider for IamTokenProvider {
    async fn get_token(&self, force_check: bool) -> Result<String, CoreError> {
        let mut state = self.state.lock().await;

        if let Some(current) = state.as_ref() {
            let now = Utc::now();
            let stale = current.is_expired(now)
                || (force_check && current.expires_within(now, self.refresh_margin));
            if !stale {
                return Ok(current.access_token.clone());
            }
        }

        let fresh = self.exchange().await?;
        debug!("IAM 토큰 갱신 성공, 만료: {}", fresh.expires_at);
        let token = fresh.access_token.clone();
        *state = Some(fresh);
        Ok(token)
    }
}

fn to_chrono(d: Duration) -> ChronoDuration {
    ChronoDuration::from_std(d).unwrap_or(ChronoDuration::MAX)
}
