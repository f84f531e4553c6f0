//! 출력 프레임 (호스트 표 형식 시계열).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 시각화 힌트
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisType {
    /// 선 그래프
    Graph,
    /// 표
    Table,
}

/// 프레임 메타데이터
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMeta {
    /// 선호 시각화
    #[serde(rename = "preferredVisualisationType")]
    pub preferred_visualization: VisType,
}

/// 필드 값 배열
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum FieldValues {
    /// 시각 열
    Time(Vec<DateTime<Utc>>),
    /// 실수 열
    Float64(Vec<f64>),
    /// 정수 열
    Int64(Vec<i64>),
}

impl FieldValues {
    /// 행 수
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Time(v) => v.len(),
            FieldValues::Float64(v) => v.len(),
            FieldValues::Int64(v) => v.len(),
        }
    }

    /// 비어 있는지 여부
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 프레임 필드 (열)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// 표시 이름
    pub name: String,
    /// 레이블 (별칭으로 대체되면 없음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,
    /// 값
    #[serde(flatten)]
    pub values: FieldValues,
}

impl Field {
    /// 새 필드 생성
    pub fn new(
        name: impl Into<String>,
        labels: Option<BTreeMap<String, String>>,
        values: FieldValues,
    ) -> Self {
        Self {
            name: name.into(),
            labels,
            values,
        }
    }
}

/// 출력 프레임 — 시각 열 하나와 값 열 하나
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 프레임 이름 (refId)
    pub name: String,
    /// 필드 목록
    pub fields: Vec<Field>,
    /// 메타데이터
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<FrameMeta>,
}

impl Frame {
    /// 새 프레임 생성
    pub fn new(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            fields,
            meta: None,
        }
    }

    /// 메타데이터 설정
    pub fn with_meta(mut self, meta: FrameMeta) -> Self {
        self.meta = Some(meta);
        self
    }

    /// 행 수 (첫 필드 기준)
    pub fn rows(&self) -> usize {
        self.fields.first().map_or(0, |f| f.values.len())
    }

    /// 시각 열을 제외한 값 필드
    pub fn value_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields
            .iter()
            .filter(|f| !matches!(f.values, FieldValues::Time(_)))
    }
}
