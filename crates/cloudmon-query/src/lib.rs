//! # cloudmon-query
//!
//! 호스트 쿼리를 모니터링 읽기 요청으로 변환하고,
//! 응답 시계열을 표 형식 프레임으로 렌더링한다.
//!
//! ## 흐름
//!
//! ```text
//! MonitoringDatasource
//!   └── QueryDispatcher::query_data()
//!         ├── translator::translate()   ← 쿼리 하나당
//!         ├── MetricsReader::read()     ← 실패는 해당 쿼리에만 기록
//!         └── renderer::render()
//! ```

pub mod datasource;
pub mod dispatcher;
pub mod renderer;
pub mod template;
pub mod translator;

pub use datasource::MonitoringDatasource;
pub use dispatcher::QueryDispatcher;
