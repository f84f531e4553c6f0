//! 결과 렌더링.
//!
//! 백엔드 시계열 목록을 호스트 프레임으로 변환한다. 입력 순서를 유지하며
//! 시계열을 합치거나 정렬하지 않는다.

use chrono::{DateTime, Utc};
use cloudmon_core::models::frame::{Field, FieldValues, Frame, FrameMeta, VisType};
use cloudmon_core::models::metrics::Series;
use std::collections::BTreeMap;

use crate::template;

/// 시각 열 이름
pub const TIME_FIELD: &str = "timestamp";

/// 밀리초 타임스탬프 → 시각 (범위 밖은 유닉스 기준 시각)
fn to_instant(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// 값 배열 선택 — 실수 값 우선
fn pick_values(series: &Series) -> Option<FieldValues> {
    let ts = &series.timeseries;
    if !ts.double_values.is_empty() {
        Some(FieldValues::Float64(ts.double_values.clone()))
    } else if !ts.int64_values.is_empty() {
        Some(FieldValues::Int64(ts.int64_values.clone()))
    } else {
        None
    }
}

/// 표시 이름과 남는 레이블 결정
fn display_name(series: &Series, alias: &str) -> (String, Option<BTreeMap<String, String>>) {
    if !alias.is_empty() {
        match template::render(alias, &series.labels) {
            Ok(name) => return (name, None),
            Err(e) => tracing::trace!("별칭 렌더 실패, 원래 이름 사용: {e}"),
        }
    }
    (series.name.clone(), Some(series.labels.clone()))
}

/// 시계열 목록을 프레임 목록으로 변환
pub fn render(series: &[Series], ref_id: &str, alias: &str) -> Vec<Frame> {
    series
        .iter()
        .filter_map(|s| {
            let values = pick_values(s)?;
            let (name, labels) = display_name(s, alias);
            let times = s.timeseries.timestamps.iter().copied().map(to_instant).collect();

            Some(
                Frame::new(
                    ref_id,
                    vec![
                        Field::new(TIME_FIELD, None, FieldValues::Time(times)),
                        Field::new(name, labels, values),
                    ],
                )
                .with_meta(FrameMeta {
                    preferred_visualization: VisType::Graph,
                }),
            )
        })
        .collect()
}
