//! 설정 및 와이어링 통합 테스트.
//!
//! 설정 파일 → AppConfig → 데이터소스 생성 검증.

use cloudmon_core::config::AppConfig;
use cloudmon_core::config_manager::ConfigManager;
use cloudmon_network::client_builder::MetricsClientBuilder;
use cloudmon_query::MonitoringDatasource;
use serde_json::json;

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();

    assert!(!config.datasource.api_endpoint.is_empty());
    assert!(config.datasource.monitoring_endpoint.is_empty());
    assert!(config.secure.key_json().is_none());

    assert!(config.client.token_timeout() < config.client.request_timeout());
    assert!(config.client.dispose_timeout().as_millis() > 0);
    assert!(config.client.query_concurrency >= 1);

    assert_eq!(config.web.port, 3300);
    assert!(!config.web.allow_external);
}

#[test]
fn config_file_drives_datasource_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        json!({
            "datasource": {
                "apiEndpoint": "api.example:443",
                "monitoringEndpoint": "http://127.0.0.1:1",
                "folderId": "b1g-from-file"
            },
            "client": {"request_timeout_ms": 1500, "query_concurrency": 4},
            "web": {"port": 4400}
        })
        .to_string(),
    )
    .unwrap();

    let manager = ConfigManager::with_path(path).unwrap();
    let config = manager.get();
    assert_eq!(config.datasource.folder_id, "b1g-from-file");
    assert_eq!(config.datasource.api_endpoint, "api.example:443");
    assert_eq!(config.client.request_timeout().as_millis(), 1500);
    assert_eq!(config.client.query_concurrency, 4);
    assert_eq!(config.client.max_retries, 3);
    assert_eq!(config.web.port, 4400);

    let datasource = tokio_test::block_on(MonitoringDatasource::new(
        config.datasource,
        config.secure,
        config.client,
    ))
    .unwrap();
    assert_eq!(datasource.folder_id(), "b1g-from-file");
}

#[test]
fn token_provider_builds_without_network() {
    let config = AppConfig::default_config();
    let builder = MetricsClientBuilder::new(config.datasource, config.secure, config.client);
    let provider = builder.token_provider().unwrap();
    assert!(!provider.uses_service_account_key());
}

#[test]
fn config_serde_roundtrip() {
    let config = AppConfig::default_config();
    let raw = serde_json::to_string(&config).unwrap();
    let restored: AppConfig = serde_json::from_str(&raw).unwrap();
    assert_eq!(restored.datasource, config.datasource);
    assert_eq!(restored.web.port, config.web.port);
    assert_eq!(restored.client.max_retries, config.client.max_retries);
}
