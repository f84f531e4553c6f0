//! # cloudmon-web
//!
//! 모니터링 데이터소스를 HTTP로 노출하는 얇은 호스트 어댑터.
//!
//! ## 엔드포인트
//! - `POST /api/query` — 쿼리 배치 실행
//! - `GET /api/health` — 헬스 체크

pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use cloudmon_core::config::WebConfig;
use cloudmon_query::MonitoringDatasource;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// 핸들러 공유 상태
#[derive(Clone)]
pub struct AppState {
    /// 데이터소스 인스턴스
    pub datasource: Arc<MonitoringDatasource>,
}

/// 데이터소스 HTTP 서버
pub struct WebServer {
    config: WebConfig,
    state: AppState,
}

impl WebServer {
    /// 새 서버 생성
    pub fn new(datasource: Arc<MonitoringDatasource>, config: WebConfig) -> Self {
        Self {
            config,
            state: AppState { datasource },
        }
    }

    /// 라우터 구성
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .nest("/api", routes::api_routes())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// 설정 포트에 바인드
    ///
    /// 포트가 사용 중이면 `AddrInUse`를 그대로 반환한다.
    pub async fn bind(&self) -> Result<TcpListener, std::io::Error> {
        let host = if self.config.allow_external {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        };
        let addr = format!("{host}:{}", self.config.port);
        TcpListener::bind(&addr).await.inspect_err(|e| {
            error!("포트 바인드 실패 {addr}: {e}");
        })
    }

    /// 바인드된 리스너로 서버 실행 (종료 신호까지)
    pub async fn serve(
        self,
        listener: TcpListener,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<(), std::io::Error> {
        info!("데이터소스 서버 시작: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(async move {
                loop {
                    if *shutdown_rx.borrow() {
                        info!("웹 서버 종료 신호 수신");
                        break;
                    }
                    if shutdown_rx.changed().await.is_err() {
                        break;
                    }
                }
            })
            .await?;

        info!("데이터소스 서버 종료");
        Ok(())
    }

    /// 바인드 후 실행
    pub async fn run(self, shutdown_rx: watch::Receiver<bool>) -> Result<(), std::io::Error> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_rx).await
    }
}
