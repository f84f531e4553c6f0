//! # cloudmon-network
//!
//! 클라우드 모니터링 HTTP 어댑터.
//! 자격 증명으로 IAM 토큰을 얻어 캐시하고, 모니터링 엔드포인트를 탐색한 뒤
//! 타임아웃/재시도 정책으로 메트릭 읽기 API를 호출한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use cloudmon_network::client_builder::MetricsClientBuilder;
//!
//! let client = MetricsClientBuilder::new(settings, secure, client_config)
//!     .build()
//!     .await?;
//! let metrics = client.read("b1gfolder", &request).await?;
//! ```

pub mod auth;
pub mod client_builder;
pub mod endpoint;
pub mod metrics_client;
