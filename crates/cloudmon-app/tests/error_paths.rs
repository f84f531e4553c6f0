//! Cross-crate 에러 경로 테스트.
//!
//! 생성 단계의 치명적 에러와 쿼리 단위 부분 실패를 검증한다.

use cloudmon_core::config::{ClientConfig, DatasourceSettings, SecureSettings};
use cloudmon_core::error::CoreError;
use cloudmon_core::models::query::QueryDataRequest;
use cloudmon_query::MonitoringDatasource;
use mockito::Matcher;
use serde_json::json;

const TOKEN_PATH: &str = "/computeMetadata/v1/instance/service-accounts/default/token";
const READ_PATH: &str = "/monitoring/v2/data/read";

fn settings(url: &str, monitoring_override: &str) -> DatasourceSettings {
    DatasourceSettings {
        api_endpoint: url.to_string(),
        monitoring_endpoint: monitoring_override.to_string(),
        folder_id: "b1g-default".to_string(),
        iam_endpoint: url.to_string(),
        metadata_endpoint: url.to_string(),
    }
}

fn batch(texts: &[(&str, &str)]) -> QueryDataRequest {
    let queries: Vec<_> = texts
        .iter()
        .map(|(ref_id, text)| {
            json!({
                "refId": ref_id,
                "timeRange": {"from": "2024-05-01T00:00:00Z", "to": "2024-05-01T01:00:00Z"},
                "queryText": text
            })
        })
        .collect();
    serde_json::from_value(json!({ "queries": queries })).unwrap()
}

#[tokio::test]
async fn discovery_failure_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _discovery = server
        .mock("GET", "/endpoints/v1/endpoints/monitoring")
        .with_status(503)
        .create_async()
        .await;

    let result = MonitoringDatasource::new(
        settings(&server.url(), ""),
        SecureSettings::default(),
        ClientConfig::default(),
    )
    .await;
    match result {
        Err(CoreError::Discovery(msg)) => assert!(msg.contains("503")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("datasource must not be created"),
    }
}

#[tokio::test]
async fn key_without_private_key_is_config_error() {
    let key = json!({"id": "ajekey", "service_account_id": "ajesa"}).to_string();
    let result = MonitoringDatasource::new(
        settings("http://127.0.0.1:1", "http://127.0.0.1:1"),
        SecureSettings {
            api_key_json: Some(key),
        },
        ClientConfig::default(),
    )
    .await;
    assert!(matches!(result, Err(CoreError::Config(_))));
}

#[tokio::test]
async fn token_failure_marks_every_query() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("GET", TOKEN_PATH)
        .with_status(500)
        .create_async()
        .await;
    let read = server
        .mock("POST", READ_PATH)
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let datasource = MonitoringDatasource::new(
        settings(&server.url(), &server.url()),
        SecureSettings::default(),
        ClientConfig::default(),
    )
    .await
    .unwrap();

    let response = datasource
        .query_data(&batch(&[("A", "cpu{}"), ("B", "mem{}")]))
        .await
        .unwrap();
    assert_eq!(response.len(), 2);
    for entry in response.iter() {
        let err = entry.error.as_deref().unwrap_or_default();
        assert!(err.contains("get token"), "{}: {err}", entry.ref_id);
    }

    let health = datasource.check_health().await;
    assert!(!health.is_ok());
    read.assert_async().await;
}

#[tokio::test]
async fn one_failing_query_does_not_abort_siblings() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("GET", TOKEN_PATH)
        .with_body(r#"{"access_token":"t","expires_in":3600}"#)
        .create_async()
        .await;
    let _bad = server
        .mock("POST", READ_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"query": "broken{"})))
        .with_status(400)
        .create_async()
        .await;
    let _good = server
        .mock("POST", READ_PATH)
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(json!({"query": "cpu{}"})))
        .with_body(
            json!({"metrics": [{
                "name": "cpu",
                "labels": {},
                "type": "DGAUGE",
                "timeseries": {"timestamps": [1000], "doubleValues": [1.0]}
            }]})
            .to_string(),
        )
        .create_async()
        .await;

    let datasource = MonitoringDatasource::new(
        settings(&server.url(), &server.url()),
        SecureSettings::default(),
        ClientConfig::default(),
    )
    .await
    .unwrap();

    let response = datasource
        .query_data(&batch(&[("A", "cpu{}"), ("B", "broken{"), ("C", "cpu{}")]))
        .await
        .unwrap();

    let ids: Vec<_> = response.iter().map(|r| r.ref_id.as_str()).collect();
    assert_eq!(ids, vec!["A", "B", "C"]);
    assert_eq!(response.get("A").unwrap().frames.len(), 1);
    assert_eq!(
        response.get("B").unwrap().error.as_deref(),
        Some("bad http status: 400")
    );
    assert_eq!(response.get("C").unwrap().frames.len(), 1);
}

#[tokio::test]
async fn reads_after_dispose_fail_per_query() {
    let mut server = mockito::Server::new_async().await;
    let _token = server
        .mock("GET", TOKEN_PATH)
        .with_body(r#"{"access_token":"t","expires_in":3600}"#)
        .create_async()
        .await;

    let datasource = MonitoringDatasource::new(
        settings(&server.url(), &server.url()),
        SecureSettings::default(),
        ClientConfig::default(),
    )
    .await
    .unwrap();
    datasource.dispose().await;
    datasource.dispose().await;

    let response = datasource.query_data(&batch(&[("A", "cpu{}")])).await.unwrap();
    let err = response.get("A").unwrap().error.clone().unwrap_or_default();
    assert!(err.contains("client closed"));
}
