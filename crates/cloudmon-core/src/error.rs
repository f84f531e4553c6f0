//! 데이터소스 핵심 에러 타입.
//!
//! 어댑터 crate는 외부 에러(reqwest, jsonwebtoken, url 등)를
//! 문맥 메시지와 함께 `CoreError` 변형으로 매핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 설정, 인증, 엔드포인트 탐색, 전송, 원격 응답, 쿼리 형식 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류 (잘못된 설정 JSON, 서비스 계정 키 파싱 실패 등)
    #[error("설정 에러: {0}")]
    Config(String),

    /// 인증 실패 (토큰 교환 실패, 타임아웃)
    #[error("인증 에러: {0}")]
    Auth(String),

    /// 모니터링 엔드포인트 탐색 실패
    #[error("엔드포인트 탐색 에러: {0}")]
    Discovery(String),

    /// 네트워크 에러 (연결 실패, 타임아웃)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 원격 API가 4xx/5xx 상태 코드를 반환함
    #[error("bad http status: {status}")]
    Remote {
        /// HTTP 상태 코드
        status: u16,
    },

    /// 호스트가 보낸 쿼리를 해석할 수 없음 (배치 전체 중단)
    #[error("쿼리 해석 실패 — {ref_id}: {message}")]
    MalformedQuery {
        /// 쿼리 식별자 (refId)
        ref_id: String,
        /// 실패 사유
        message: String,
    },

    /// 실행 타임아웃
    #[error("실행 타임아웃: {timeout_ms}ms 초과")]
    Timeout {
        /// 초과된 타임아웃 시간 (밀리초)
        timeout_ms: u64,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}
