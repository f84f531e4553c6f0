//! # cloudmon-core
//!
//! 클라우드 모니터링 데이터소스의 도메인 모델, 포트(trait) 정의, 에러 타입.
//! 네트워크 어댑터와 쿼리 변환 계층이 공유하는 핵심 타입과 인터페이스를 제공한다.
//!
//! ## 구조
//!
//! - [`models`] — 백엔드 와이어 타입, 호스트 쿼리/응답 봉투, 출력 프레임
//! - [`ports`] — Hexagonal Architecture 포트 인터페이스 (async_trait)
//! - [`error`] — 핵심 에러 타입 (thiserror)
//! - [`config`] — 데이터소스/클라이언트/웹 설정 구조체
//! - [`config_manager`] — 설정 파일 관리 (로드/리로드)

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
