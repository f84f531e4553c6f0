//! 데이터소스 도메인 모델.
//!
//! 백엔드 와이어 타입, 호스트 쿼리/응답 봉투, 자격 증명, 출력 프레임을 정의한다.

pub mod credentials;
pub mod frame;
pub mod health;
pub mod metrics;
pub mod query;
