//! 쿼리 변환.
//!
//! 해석된 호스트 쿼리 하나를 (폴더 ID, 읽기 요청) 쌍으로 바꾼다.
//! 순수 함수이며 네트워크나 상태에 의존하지 않는다.

use cloudmon_core::models::metrics::{Downsampling, GapFilling, GridAggregation, MetricsRequest};
use cloudmon_core::models::query::IncomingQuery;

/// 집계 함수 이름 해석 (대소문자 무시, 알 수 없으면 AVG)
pub fn parse_aggregation(name: &str) -> GridAggregation {
    GridAggregation::ALL
        .into_iter()
        .find(|g| g.as_str().eq_ignore_ascii_case(name))
        .unwrap_or(GridAggregation::Avg)
}

/// 포인트 예산 → `maxPoints` (0 이하는 생략)
fn max_points(budget: i64) -> Option<u32> {
    (budget > 0).then(|| u32::try_from(budget).unwrap_or(u32::MAX))
}

/// 쿼리 변환 — 쿼리의 폴더 재지정이 비어 있으면 기본 폴더 사용
pub fn translate(query: &IncomingQuery, default_folder_id: &str) -> (String, MetricsRequest) {
    let folder_id = if query.folder_id.is_empty() {
        default_folder_id.to_string()
    } else {
        query.folder_id.clone()
    };

    let request = MetricsRequest {
        query: query.query_text.clone(),
        from_time: query.time_range.from,
        to_time: query.time_range.to,
        downsampling: Downsampling {
            grid_aggregation: parse_aggregation(&query.aggregation),
            gap_filling: GapFilling::None,
            max_points: max_points(query.max_points),
            grid_interval: None,
            disabled: false,
        },
    };

    (folder_id, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use cloudmon_core::models::query::TimeRange;

    fn query(folder_id: &str, aggregation: &str, max_points: i64) -> IncomingQuery {
        IncomingQuery {
            ref_id: "A".to_string(),
            folder_id: folder_id.to_string(),
            query_text: "requests_count{}".to_string(),
            aggregation: aggregation.to_string(),
            alias: String::new(),
            time_range: TimeRange {
                from: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
                to: Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap(),
            },
            max_points,
        }
    }

    #[test]
    fn aggregation_names_case_insensitive() {
        let cases = [
            ("avg", GridAggregation::Avg),
            ("MAX", GridAggregation::Max),
            ("Min", GridAggregation::Min),
            ("sUm", GridAggregation::Sum),
            ("last", GridAggregation::Last),
            ("COUNT", GridAggregation::Count),
        ];
        for (name, expected) in cases {
            assert_eq!(parse_aggregation(name), expected, "{name}");
        }
    }

    #[test]
    fn unknown_aggregation_defaults_to_avg() {
        for name in ["", "median", "p99", "maxx", "AVERAGE", " max"] {
            assert_eq!(parse_aggregation(name), GridAggregation::Avg, "{name:?}");
        }
    }

    #[test]
    fn folder_override_wins() {
        let (folder, _) = translate(&query("override", "", 10), "default");
        assert_eq!(folder, "override");

        let (folder, _) = translate(&query("", "", 10), "default");
        assert_eq!(folder, "default");
    }

    #[test]
    fn request_carries_query_range_and_points() {
        let q = query("", "sum", 100);
        let (_, req) = translate(&q, "f");
        assert_eq!(req.query, "requests_count{}");
        assert_eq!(req.from_time, q.time_range.from);
        assert_eq!(req.to_time, q.time_range.to);
        assert_eq!(req.downsampling.grid_aggregation, GridAggregation::Sum);
        assert_eq!(req.downsampling.gap_filling, GapFilling::None);
        assert_eq!(req.downsampling.max_points, Some(100));
        assert_eq!(req.downsampling.grid_interval, None);
        assert!(!req.downsampling.disabled);
    }

    #[test]
    fn non_positive_budget_omits_max_points() {
        let (_, req) = translate(&query("", "", 0), "f");
        assert_eq!(req.downsampling.max_points, None);
        let (_, req) = translate(&query("", "", -5), "f");
        assert_eq!(req.downsampling.max_points, None);
    }

    #[test]
    fn translation_is_deterministic() {
        let q = query("x", "max", 42);
        assert_eq!(translate(&q, "f"), translate(&q, "f"));
    }
}
