//! 호스트 쿼리/응답 봉투.
//!
//! 호스트는 `refId`, 시간 범위, 포인트 예산과 함께 쿼리 편집기 모델 필드를
//! 같은 객체에 담아 보낸다. 모델 필드는 [`DataQuery::to_incoming`]에서 해석한다.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::CoreError;
use crate::models::frame::Frame;

/// 쿼리 시간 범위 (양 끝 포함)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// 시작 시각
    pub from: DateTime<Utc>,
    /// 종료 시각
    pub to: DateTime<Utc>,
}

/// 호스트가 보낸 단일 쿼리
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    /// 쿼리 식별자
    pub ref_id: String,
    /// 시간 범위
    pub time_range: TimeRange,
    /// 최대 포인트 수
    #[serde(default)]
    pub max_data_points: i64,
    /// 호스트가 계산한 간격 (밀리초, 참고용)
    #[serde(default)]
    pub interval_ms: i64,
    /// 쿼리 편집기 모델 (나머지 필드)
    #[serde(flatten)]
    pub model: serde_json::Map<String, serde_json::Value>,
}

/// 쿼리 편집기 모델
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringQuery {
    /// 폴더 ID 재지정
    #[serde(default)]
    pub folder_id: Option<String>,
    /// 집계 함수 이름
    #[serde(default)]
    pub aggregation: Option<String>,
    /// 레이블 별칭 템플릿
    #[serde(default)]
    pub alias: Option<String>,
    /// 쿼리 텍스트
    #[serde(default)]
    pub query_text: Option<String>,
}

/// 해석된 단일 쿼리
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingQuery {
    /// 쿼리 식별자
    pub ref_id: String,
    /// 폴더 ID 재지정 (비어 있으면 기본값)
    pub folder_id: String,
    /// 쿼리 텍스트
    pub query_text: String,
    /// 집계 함수 이름
    pub aggregation: String,
    /// 레이블 별칭 템플릿
    pub alias: String,
    /// 시간 범위
    pub time_range: TimeRange,
    /// 최대 포인트 수
    pub max_points: i64,
}

impl DataQuery {
    /// 모델 필드를 해석하여 [`IncomingQuery`] 생성
    pub fn to_incoming(&self) -> Result<IncomingQuery, CoreError> {
        let model: MonitoringQuery =
            serde_json::from_value(serde_json::Value::Object(self.model.clone())).map_err(
                |e| CoreError::MalformedQuery {
                    ref_id: self.ref_id.clone(),
                    message: e.to_string(),
                },
            )?;

        Ok(IncomingQuery {
            ref_id: self.ref_id.clone(),
            folder_id: model.folder_id.unwrap_or_default(),
            query_text: model.query_text.unwrap_or_default(),
            aggregation: model.aggregation.unwrap_or_default(),
            alias: model.alias.unwrap_or_default(),
            time_range: self.time_range,
            max_points: self.max_data_points,
        })
    }
}

/// 쿼리 배치 요청
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryDataRequest {
    /// 쿼리 목록
    #[serde(default)]
    pub queries: Vec<DataQuery>,
}

/// 단일 쿼리 결과 — 에러 또는 프레임 목록
#[derive(Debug, Clone, Default, Serialize)]
pub struct DataResponse {
    /// 쿼리 식별자
    #[serde(skip)]
    pub ref_id: String,
    /// 출력 프레임
    pub frames: Vec<Frame>,
    /// 읽기 실패 메시지
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DataResponse {
    /// 에러 여부
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// 쿼리 배치 응답
///
/// 입력 순서를 유지하며, JSON에서는 `refId`를 키로 하는 객체로 직렬화된다.
#[derive(Debug, Clone, Default)]
pub struct QueryDataResponse {
    responses: Vec<DataResponse>,
}

impl QueryDataResponse {
    /// 빈 응답 생성
    pub fn new() -> Self {
        Self::default()
    }

    /// `ref_id` 항목 반환 (없으면 끝에 추가)
    pub fn entry(&mut self, ref_id: &str) -> &mut DataResponse {
        let idx = match self.responses.iter().position(|r| r.ref_id == ref_id) {
            Some(idx) => idx,
            None => {
                self.responses.push(DataResponse {
                    ref_id: ref_id.to_string(),
                    ..Default::default()
                });
                self.responses.len() - 1
            }
        };
        &mut self.responses[idx]
    }

    /// `ref_id` 항목 조회
    pub fn get(&self, ref_id: &str) -> Option<&DataResponse> {
        self.responses.iter().find(|r| r.ref_id == ref_id)
    }

    /// 입력 순서대로 항목 순회
    pub fn iter(&self) -> impl Iterator<Item = &DataResponse> {
        self.responses.iter()
    }

    /// 항목 수
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }
}

impl Serialize for QueryDataResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Results<'a>(&'a [DataResponse]);

        impl Serialize for Results<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for resp in self.0 {
                    map.serialize_entry(&resp.ref_id, resp)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("results", &Results(&self.responses))?;
        map.end()
    }
}
