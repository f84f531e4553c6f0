//! 베어러 토큰 제공자 포트.
//!
//! 구현: `cloudmon-network::auth::IamTokenProvider`

use async_trait::async_trait;

use crate::error::CoreError;

/// 베어러 토큰 제공자
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// 유효한 베어러 토큰 반환
    ///
    /// 캐시된 토큰이 없거나, `force_check`가 참이고 만료가 임박했으면
    /// 신원 서비스와 교환하여 새 토큰을 캐시한다.
    async fn get_token(&self, force_check: bool) -> Result<String, CoreError>;
}
