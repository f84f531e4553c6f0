//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! `cloudmon-network`가 이 trait들을 구현하며,
//! 쿼리 계층은 `Arc<dyn T>`로 주입받는다.
//!
//! 모든 async trait은 `async_trait` 매크로를 사용하여
//! object safety를 보장한다.

pub mod metrics_reader;
pub mod token_provider;
