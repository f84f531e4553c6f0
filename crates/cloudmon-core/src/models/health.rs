//! 헬스 체크 결과.

use serde::{Deserialize, Serialize};

/// 헬스 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HealthStatus {
    /// 정상
    Ok,
    /// 비정상
    Error,
}

/// 헬스 체크 결과
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckHealthResult {
    /// 상태
    pub status: HealthStatus,
    /// 메시지 ("OK" 또는 에러 메시지)
    pub message: String,
}

impl CheckHealthResult {
    /// 정상 결과
    pub fn ok() -> Self {
        Self {
            status: HealthStatus::Ok,
            message: "OK".to_string(),
        }
    }

    /// 비정상 결과
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Error,
            message: message.into(),
        }
    }

    /// 정상 여부
    pub fn is_ok(&self) -> bool {
        self.status == HealthStatus::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_result_json() {
        let json = serde_json::to_value(CheckHealthResult::error("get token: timeout")).unwrap();
        assert_eq!(json["status"], "ERROR");
        assert_eq!(json["message"], "get token: timeout");
        assert!(CheckHealthResult::ok().is_ok());
    }
}
