//! Integration tests for API endpoints
//!
//! These tests verify that:
//! - Every valid selector yields exactly its targets, in registry order
//! - Total backend outage is still a 200 with every target unavailable
//! - Invalid parameters are rejected with 400 before anything is probed
//! - Graph rendering is deterministic and validated
//! - Unexpected provider failures surface as 500

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use monitormach::{
    Metric, Period,
    api::{ApiConfig, ApiState, spawn_api_server},
    graph::{GraphDataProvider, GraphError, GraphResult, Sample},
    report::{AvailabilityResponse, GraphResponse, LatencyResponse},
};
use pretty_assertions::assert_eq;
use serde_json::Value;

use crate::helpers::*;

const TIMEOUT: Duration = Duration::from_secs(2);

async fn get(addr: std::net::SocketAddr, path_and_query: &str) -> reqwest::Response {
    reqwest::Client::new()
        .get(format!("http://{addr}{path_and_query}"))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let (addr, _) = spawn_test_api(&[("poke_api", dead_url())], TIMEOUT).await;

    let response = get(addr, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_check_latency_keys_match_every_selector() {
    let api = mock_target(200, Duration::from_millis(100)).await;
    let stats = mock_target(200, Duration::ZERO).await;
    let images = mock_target(500, Duration::ZERO).await;
    let targets = [
        ("poke_api", api.uri()),
        ("poke_stats", stats.uri()),
        ("poke_images", images.uri()),
    ];
    let (addr, _) = spawn_test_api(&targets, TIMEOUT).await;

    let cases = [
        ("all", vec!["poke_api", "poke_stats", "poke_images"]),
        ("poke_api", vec!["poke_api"]),
        ("poke_stats", vec!["poke_stats"]),
        ("poke_images", vec!["poke_images"]),
    ];

    for (module, expected) in cases {
        let response = get(addr, &format!("/check_latency?module={module}")).await;
        assert_eq!(response.status(), StatusCode::OK, "module={module}");

        let body: LatencyResponse = response.json().await.unwrap();
        assert_eq!(body.module, module);
        assert_eq!(body.results.keys().collect::<Vec<_>>(), expected);
    }
}

#[tokio::test]
async fn test_check_latency_defaults_to_all_and_reports_entries() {
    let api = mock_target(200, Duration::ZERO).await;
    let images = mock_target(503, Duration::ZERO).await;
    let (addr, _) = spawn_test_api(
        &[
            ("poke_api", api.uri()),
            ("poke_stats", dead_url()),
            ("poke_images", images.uri()),
        ],
        TIMEOUT,
    )
    .await;

    let response = get(addr, "/check_latency").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json: Value = response.json().await.unwrap();
    assert_eq!(json["module"], "all");
    assert_eq!(json["results"]["poke_api"]["status_code"], 200);
    assert!(json["results"]["poke_api"]["latency_ms"].is_number());
    assert!(json["results"]["poke_api"].get("error").is_none());
    assert!(json["results"]["poke_stats"]["status_code"].is_null());
    assert_eq!(json["results"]["poke_stats"]["error"], "connectionFailure");
    assert_eq!(json["results"]["poke_images"]["status_code"], 503);
    assert_eq!(json["results"]["poke_images"]["error"], "httpError");
    assert!(json["total_latency_ms"].is_number());
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_module_is_case_insensitive() {
    let api = mock_target(200, Duration::ZERO).await;
    let (addr, _) = spawn_test_api(&[("poke_api", api.uri())], TIMEOUT).await;

    let response = get(addr, "/check_availability?module=POKE_Api").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: AvailabilityResponse = response.json().await.unwrap();
    assert_eq!(body.module, "poke_api");
    assert_eq!(body.availability.get("poke_api"), Some(&true));
}

#[tokio::test]
async fn test_total_outage_is_still_ok() {
    let (addr, _) = spawn_test_api(
        &[
            ("poke_api", dead_url()),
            ("poke_stats", dead_url()),
            ("poke_images", dead_url()),
        ],
        TIMEOUT,
    )
    .await;

    let response = get(addr, "/check_availability?module=all").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: AvailabilityResponse = response.json().await.unwrap();
    assert_eq!(
        body.availability.keys().collect::<Vec<_>>(),
        vec!["poke_api", "poke_stats", "poke_images"]
    );
    assert!(body.availability.values().all(|up| !up));
}

#[tokio::test]
async fn test_slow_target_is_bounded_over_http() {
    let slow = mock_target(200, Duration::from_secs(3)).await;
    let fast = mock_target(200, Duration::ZERO).await;
    let (addr, _) = spawn_test_api(
        &[("slow", slow.uri()), ("fast", fast.uri())],
        Duration::from_millis(250),
    )
    .await;

    let body: LatencyResponse = get(addr, "/check_latency").await.json().await.unwrap();

    let slow = body.results.get("slow").unwrap();
    assert_eq!(slow.latency_ms, 250.0);
    assert_eq!(slow.status_code, None);
    assert_eq!(body.results.get("fast").unwrap().status_code, Some(200));
    assert!(body.total_latency_ms < 250.0 + 500.0);
}

#[tokio::test]
async fn test_invalid_parameters_are_rejected_without_probing() {
    let api = untouchable_target().await;
    let stats = untouchable_target().await;
    let (addr, observer) = spawn_test_api(
        &[("poke_api", api.uri()), ("poke_stats", stats.uri())],
        TIMEOUT,
    )
    .await;

    let cases = [
        ("/check_latency?module=bogus", "module", "bogus"),
        ("/check_availability?module=all_of_them", "module", "all_of_them"),
        ("/render_graph?metric=foo", "metric", "foo"),
        ("/render_graph?metric=latency&module=nope", "module", "nope"),
        ("/render_graph?metric=latency&period=last9days", "period", "last9days"),
        ("/render_graph", "metric", ""),
    ];

    for (path_and_query, field, value) in cases {
        let response = get(addr, path_and_query).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{path_and_query}"
        );

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["field"], field, "{path_and_query}");
        assert_eq!(json["value"], value, "{path_and_query}");
        assert_eq!(json["error"], format!("Invalid {field} parameter"));
    }

    assert_eq!(observer.probes_started(), 0);
    assert_eq!(observer.rejections(), cases.len());
}

#[tokio::test]
async fn test_render_graph_is_idempotent() {
    let (addr, _) = spawn_test_api(&[("poke_api", dead_url())], TIMEOUT).await;

    let path = "/render_graph?metric=availability&module=all&period=last5days";
    let first: GraphResponse = get(addr, path).await.json().await.unwrap();
    let second: GraphResponse = get(addr, path).await.json().await.unwrap();

    assert_eq!(first.data.len(), 5);
    assert_eq!(first.data, second.data);
    assert_eq!(first.data, vec![95, 96, 97, 95, 94]);
    assert_eq!(first.metric, Metric::Availability);
    assert_eq!(first.period, Period::Last5Days);
    assert_eq!(first.module, "all");
}

#[tokio::test]
async fn test_render_graph_normalizes_and_defaults() {
    let (addr, observer) = spawn_test_api(&[("poke_api", dead_url())], TIMEOUT).await;

    let body: GraphResponse = get(addr, "/render_graph?metric=LATENCY&module=Poke_Api")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body.metric, Metric::Latency);
    assert_eq!(body.module, "poke_api");
    assert_eq!(body.period, Period::Last5Days);
    assert_eq!(body.data, vec![120, 110, 130, 115, 125]);

    let body: GraphResponse = get(addr, "/render_graph?metric=latency&period=Last7Days")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body.period, Period::Last7Days);
    assert_eq!(body.data.len(), 7);

    // Graph rendering never probes
    assert_eq!(observer.probes_started(), 0);
}

#[tokio::test]
async fn test_repeated_parameters_use_the_first_value() {
    let api = mock_target(200, Duration::ZERO).await;
    let stats = untouchable_target().await;
    let (addr, observer) = spawn_test_api(
        &[("poke_api", api.uri()), ("poke_stats", stats.uri())],
        TIMEOUT,
    )
    .await;

    let response = get(addr, "/check_latency?module=poke_api&module=all").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: LatencyResponse = response.json().await.unwrap();
    assert_eq!(body.module, "poke_api");
    assert_eq!(body.results.keys().collect::<Vec<_>>(), vec!["poke_api"]);

    let response = get(addr, "/render_graph?metric=latency&metric=foo&period=last7days").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: GraphResponse = response.json().await.unwrap();
    assert_eq!(body.metric, Metric::Latency);
    assert_eq!(body.period, Period::Last7Days);

    assert_eq!(observer.rejections(), 0);
}

#[tokio::test]
async fn test_repeated_parameters_are_validated_as_json() {
    let api = untouchable_target().await;
    let (addr, observer) = spawn_test_api(&[("poke_api", api.uri())], TIMEOUT).await;

    let cases = [
        ("/check_availability?module=bogus&module=all", "module", "bogus"),
        ("/render_graph?metric=foo&metric=latency", "metric", "foo"),
    ];

    for (path_and_query, field, value) in cases {
        let response = get(addr, path_and_query).await;
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "{path_and_query}"
        );

        let json: Value = response.json().await.unwrap();
        assert_eq!(json["field"], field, "{path_and_query}");
        assert_eq!(json["value"], value, "{path_and_query}");
    }

    assert_eq!(observer.probes_started(), 0);
    assert_eq!(observer.rejections(), cases.len());
}

#[tokio::test]
async fn test_graph_samples_are_whole_numbers_on_the_wire() {
    let (addr, _) = spawn_test_api(&[("poke_api", dead_url())], TIMEOUT).await;

    let text = get(addr, "/render_graph?metric=availability")
        .await
        .text()
        .await
        .unwrap();

    assert!(text.contains(r#""data":[95,96,97,95,94]"#), "{text}");
}

struct BrokenProvider;

#[async_trait]
impl GraphDataProvider for BrokenProvider {
    async fn lookup(&self, _metric: Metric, _period: Period) -> GraphResult<Vec<Sample>> {
        Err(GraphError::Backend("store unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn test_graph_provider_failure_is_internal_error() {
    let observer = RecordingObserver::new();
    let aggregator = aggregator(&[("poke_api", dead_url())], TIMEOUT, observer.clone());
    let state = ApiState::new(
        Arc::new(aggregator),
        Arc::new(monitormach::StaticGraphData::new()),
        observer,
    )
    .with_graph_provider(Arc::new(BrokenProvider));

    let config = ApiConfig {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        enable_cors: false,
    };
    let addr = spawn_api_server(config, state).await.unwrap();

    let response = get(addr, "/render_graph?metric=latency").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json().await.unwrap();
    assert_eq!(json["error"], "graph backend error: store unavailable");
}
