//! 모니터링 읽기 API 와이어 타입.
//!
//! `POST /monitoring/v2/data/read` 요청/응답 본문과 동일한 JSON 형태를 유지한다.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// 그리드 집계 함수
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GridAggregation {
    /// 평균
    #[default]
    Avg,
    /// 최대값
    Max,
    /// 최소값
    Min,
    /// 합계
    Sum,
    /// 마지막 값
    Last,
    /// 개수
    Count,
}

impl GridAggregation {
    /// 전체 변형 목록
    pub const ALL: [GridAggregation; 6] = [
        GridAggregation::Avg,
        GridAggregation::Max,
        GridAggregation::Min,
        GridAggregation::Sum,
        GridAggregation::Last,
        GridAggregation::Count,
    ];

    /// 와이어 텍스트
    pub fn as_str(self) -> &'static str {
        match self {
            GridAggregation::Avg => "AVG",
            GridAggregation::Max => "MAX",
            GridAggregation::Min => "MIN",
            GridAggregation::Sum => "SUM",
            GridAggregation::Last => "LAST",
            GridAggregation::Count => "COUNT",
        }
    }

    /// 와이어 텍스트 해석 (정확히 일치하는 경우만)
    pub fn from_wire(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == text)
    }
}

impl fmt::Display for GridAggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for GridAggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GridAggregation {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_wire(&text)
            .ok_or_else(|| de::Error::custom(format!("unknown grid aggregation: {text}")))
    }
}

/// 빈 구간 채우기 정책
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum GapFilling {
    /// 채우지 않음
    #[default]
    None,
    /// null로 채움
    Null,
    /// 직전 값으로 채움
    Previous,
}

impl GapFilling {
    /// 와이어 텍스트
    pub fn as_str(self) -> &'static str {
        match self {
            GapFilling::None => "NONE",
            GapFilling::Null => "NULL",
            GapFilling::Previous => "PREVIOUS",
        }
    }

    /// 와이어 텍스트 해석
    pub fn from_wire(text: &str) -> Option<Self> {
        match text {
            "NONE" => Some(GapFilling::None),
            "NULL" => Some(GapFilling::Null),
            "PREVIOUS" => Some(GapFilling::Previous),
            _ => None,
        }
    }
}

impl Serialize for GapFilling {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GapFilling {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::from_wire(&text)
            .ok_or_else(|| de::Error::custom(format!("unknown gap filling: {text}")))
    }
}

/// 다운샘플링 설정
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Downsampling {
    /// 그리드 집계 함수
    pub grid_aggregation: GridAggregation,
    /// 빈 구간 채우기
    #[serde(default)]
    pub gap_filling: GapFilling,
    /// 최대 포인트 수
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u32>,
    /// 그리드 간격 (밀리초)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_interval: Option<i64>,
    /// 다운샘플링 비활성화
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disabled: bool,
}

/// 메트릭 읽기 요청 본문
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsRequest {
    /// 쿼리 텍스트
    pub query: String,
    /// 시작 시각
    pub from_time: DateTime<Utc>,
    /// 종료 시각
    pub to_time: DateTime<Utc>,
    /// 다운샘플링 설정
    pub downsampling: Downsampling,
}

/// 메트릭 읽기 응답 본문
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// 시계열 목록
    #[serde(default)]
    pub metrics: Vec<Series>,
}

/// 단일 시계열
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Series {
    /// 메트릭 이름
    #[serde(default)]
    pub name: String,
    /// 레이블
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    /// 메트릭 타입 (DGAUGE, IGAUGE, COUNTER …)
    #[serde(default, rename = "type")]
    pub metric_type: String,
    /// 포인트 데이터
    #[serde(default)]
    pub timeseries: Timeseries,
}

/// 시계열 포인트 데이터 (값 배열은 둘 중 하나만 채워진다)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeseries {
    /// 유닉스 밀리초 타임스탬프
    #[serde(default, deserialize_with = "deserialize_int64_list")]
    pub timestamps: Vec<i64>,
    /// 실수 값
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub double_values: Vec<f64>,
    /// 정수 값
    #[serde(
        default,
        skip_serializing_if = "Vec::is_empty",
        deserialize_with = "deserialize_int64_list"
    )]
    pub int64_values: Vec<i64>,
}

/// 숫자 또는 문자열로 인코딩된 int64 (protobuf JSON 매핑)
#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Number(i64),
    Text(String),
}

fn deserialize_int64_list<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Int64Repr>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|v| match v {
            Int64Repr::Number(n) => Ok(n),
            Int64Repr::Text(s) => s
                .parse::<i64>()
                .map_err(|e| de::Error::custom(format!("invalid int64 {s:?}: {e}"))),
        })
        .collect()
}
