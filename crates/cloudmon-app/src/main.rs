//! # cloudmon-app
//!
//! 모니터링 데이터소스 바이너리 진입점.
//! 설정 로드, 데이터소스 생성, HTTP 어댑터 실행, 종료 처리.

mod lifecycle;

use anyhow::{Context, Result};
use clap::Parser;
use cloudmon_core::config_manager::ConfigManager;
use cloudmon_query::MonitoringDatasource;
use cloudmon_web::WebServer;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;

/// 클라우드 모니터링 데이터소스
///
/// 대시보드 호스트의 쿼리를 모니터링 API 읽기 요청으로 중계한다.
#[derive(Parser, Debug)]
#[command(name = "cloudmon")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// HTTP 포트 (설정 파일 값보다 우선)
    #[arg(long, short = 'p')]
    port: Option<u16>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "cloudmon={0},cloudmon_app={0},cloudmon_core={0},cloudmon_network={0},cloudmon_query={0},cloudmon_web={0},tower_http={0}",
        args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let config_manager = match args.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    }
    .context("설정 관리자 초기화 실패")?;
    info!("설정 파일: {:?}", config_manager.config_path());

    let mut config = config_manager.get();
    if let Some(port) = args.port {
        config.web.port = port;
    }

    let datasource = MonitoringDatasource::new(config.datasource, config.secure, config.client)
        .await
        .context("데이터소스 생성 실패")?;
    let datasource = Arc::new(datasource);
    info!("데이터소스 준비 완료: folder_id={}", datasource.folder_id());

    let lifecycle = LifecycleManager::new();
    let server = WebServer::new(datasource.clone(), config.web);
    let listener = match server.bind().await {
        Ok(listener) => listener,
        Err(e) => {
            datasource.dispose().await;
            return Err(e).context("웹 서버 바인드 실패");
        }
    };
    info!("데이터소스 서버 주소: http://{}", listener.local_addr()?);

    let shutdown_rx = lifecycle.subscribe();
    let mut server_task = tokio::spawn(async move { server.serve(listener, shutdown_rx).await });

    let early_exit = tokio::select! {
        _ = lifecycle.wait_for_signal() => None,
        result = &mut server_task => Some(result),
    };
    let finished = match early_exit {
        Some(result) => result,
        None => server_task.await,
    };
    match finished {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("웹 서버 에러: {e}"),
        Err(e) => error!("웹 서버 태스크 실패: {e}"),
    }

    datasource.dispose().await;
    info!("cloudmon 종료");
    Ok(())
}
