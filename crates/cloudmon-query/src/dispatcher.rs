//! 쿼리 배치 디스패처.
//!
//! 배치의 모든 쿼리를 먼저 해석한 뒤(하나라도 잘못되면 배치 전체 실패)
//! 쿼리마다 변환 → 읽기 → 렌더링을 수행한다. 읽기 실패는 해당 쿼리
//! 항목에만 기록되고 나머지 쿼리는 계속 진행된다.

use cloudmon_core::error::CoreError;
use cloudmon_core::models::frame::Frame;
use cloudmon_core::models::query::{IncomingQuery, QueryDataRequest, QueryDataResponse};
use cloudmon_core::ports::metrics_reader::MetricsReader;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, warn, Span};

use crate::{renderer, translator};

/// 쿼리 배치 디스패처
pub struct QueryDispatcher {
    reader: Arc<dyn MetricsReader>,
    folder_id: String,
    concurrency: usize,
    span: Span,
}

impl QueryDispatcher {
    /// 새 디스패처 생성 (순차 처리)
    pub fn new(reader: Arc<dyn MetricsReader>, folder_id: impl Into<String>) -> Self {
        let folder_id = folder_id.into();
        let span = tracing::info_span!("monitoring_datasource", folder_id = %folder_id);
        Self {
            reader,
            folder_id,
            concurrency: 1,
            span,
        }
    }

    /// 로깅 스팬 지정
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// 배치 내 동시 읽기 수 (0은 1로 취급)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// 기본 폴더 ID
    pub fn folder_id(&self) -> &str {
        &self.folder_id
    }

    /// 쿼리 배치 처리
    pub async fn query_data(
        &self,
        request: &QueryDataRequest,
    ) -> Result<QueryDataResponse, CoreError> {
        let queries = request
            .queries
            .iter()
            .map(|q| {
                q.to_incoming().inspect_err(|e| {
                    warn!(parent: &self.span, ref_id = %q.ref_id, "잘못된 쿼리, 배치 중단: {e}");
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(parent: &self.span, "쿼리 배치 시작: {}개", queries.len());

        let results: Vec<_> = stream::iter(queries)
            .map(|query| async move {
                let result = self.run(&query).await;
                (query, result)
            })
            .buffered(self.concurrency)
            .collect()
            .await;

        let mut response = QueryDataResponse::new();
        for (query, result) in results {
            let entry = response.entry(&query.ref_id);
            match result {
                Ok(frames) => entry.frames.extend(frames),
                Err(e) => {
                    warn!(parent: &self.span, ref_id = %query.ref_id, "쿼리 읽기 실패: {e}");
                    entry.error = Some(e.to_string());
                }
            }
        }
        Ok(response)
    }

    /// 단일 쿼리 처리
    async fn run(&self, query: &IncomingQuery) -> Result<Vec<Frame>, CoreError> {
        let (folder_id, request) = translator::translate(query, &self.folder_id);
        let response = self.reader.read(&folder_id, &request).await?;
        debug!(
            parent: &self.span,
            ref_id = %query.ref_id,
            "시계열 {}개 수신",
            response.metrics.len()
        );
        Ok(renderer::render(&response.metrics, &query.ref_id, &query.alias))
    }
}
