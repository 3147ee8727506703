//! HTTP surface tests, driven through the router (and a real socket for the dashboard)

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::{SinkExt, StreamExt};
use gas_tracker::{
    config::ChainRegistry,
    handlers::AppState,
    models::{Chain, GasPriceSample, GasSnapshot},
    router::build_router,
    services::{AggregationService, Analytics, GasPriceSource, HistoryStore, UsdRate},
};
use reqwest::Url;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tower::ServiceExt;
use uuid::Uuid;

struct StaticPrices(Vec<Option<f64>>);

#[async_trait]
impl GasPriceSource for StaticPrices {
    async fn fetch_all(&self, chains: &[Chain]) -> Result<GasSnapshot> {
        Ok(GasSnapshot::new(
            chains
                .iter()
                .zip(self.0.iter())
                .map(|(chain, price)| GasPriceSample {
                    chain: chain.name.clone(),
                    price_gwei: *price,
                })
                .collect(),
        ))
    }
}

struct Unreachable;

#[async_trait]
impl GasPriceSource for Unreachable {
    async fn fetch_all(&self, _chains: &[Chain]) -> Result<GasSnapshot> {
        anyhow::bail!("connection refused")
    }
}

struct TestApp {
    router: Router,
    history: Arc<HistoryStore>,
    dir: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

fn app(source: Arc<dyn GasPriceSource>) -> TestApp {
    let url = Url::parse("http://localhost:8545").unwrap();
    let registry = ChainRegistry::new(vec![
        Chain::new("Ethereum", url.clone()),
        Chain::new("Polygon", url.clone()),
        Chain::new("Arbitrum", url),
    ])
    .unwrap();

    let dir = std::env::temp_dir().join(format!("gas-tracker-api-{}", Uuid::new_v4()));
    let analytics = Arc::new(Analytics::new());
    let history = Arc::new(HistoryStore::new(dir.join("GasHistory.json"), analytics.clone()));
    let aggregator = Arc::new(AggregationService::new(
        registry,
        source,
        UsdRate::Fixed(2000.0),
        history.clone(),
        analytics.clone(),
    ));

    let router = build_router(AppState {
        aggregator,
        history: history.clone(),
        analytics,
        dashboard_interval: Duration::from_secs(15),
    });

    TestApp { router, history, dir }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn root_reports_running() {
    let app = app(Arc::new(StaticPrices(vec![])));
    let response = app.router.clone().oneshot(get("/")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Real-Time Gas Tracker Backend is running");
}

#[tokio::test]
async fn current_prices_include_nulls_in_registry_order() {
    let app = app(Arc::new(StaticPrices(vec![Some(21.5), None, Some(0.01)])));

    let response = app.router.clone().oneshot(get("/api/gas-history")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    assert_eq!(
        std::str::from_utf8(&bytes).unwrap(),
        r#"{"Ethereum":21.5,"Polygon":null,"Arbitrum":0.01}"#
    );
}

#[tokio::test]
async fn current_prices_fail_with_500_when_batch_fails() {
    let app = app(Arc::new(Unreachable));

    let (status, body) = send(&app.router, get("/api/gas-history")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch gas prices");
}

#[tokio::test]
async fn simulate_returns_rows_and_records_history() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), None, Some(0.1)])));

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/simulate", json!({ "ethAmount": 1 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [
                {
                    "chain": "Ethereum",
                    "gasPriceGwei": 50.0,
                    "gasLimit": 21000,
                    "gasCostInEth": "0.001050",
                    "gasCostInUsd": "2.10"
                },
                { "chain": "Polygon", "error": "Gas price unavailable" },
                {
                    "chain": "Arbitrum",
                    "gasPriceGwei": 0.1,
                    "gasLimit": 21000,
                    "gasCostInEth": "0.000002",
                    "gasCostInUsd": "0.00"
                }
            ]
        })
    );

    let (status, history) = send(&app.router, get("/gas-history")).await;
    assert_eq!(status, StatusCode::OK);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["chain"], "Ethereum");
    assert_eq!(history[0]["gasCostEth"], "0.001050");
    assert_eq!(history[1]["chain"], "Arbitrum");
}

#[tokio::test]
async fn simulate_without_amount_is_rejected_without_writes() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), Some(30.0), Some(0.1)])));

    let (status, body) = send(&app.router, post_json("/api/v1/simulate", json!({}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ethAmount is required");
    assert!(app.history.read_all().await.is_empty());
}

#[tokio::test]
async fn simulate_with_unparsable_body_is_rejected() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), Some(30.0), Some(0.1)])));
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/simulate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send(&app.router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ethAmount is required");
}

#[tokio::test]
async fn simulate_fails_as_a_whole_when_batch_fails() {
    let app = app(Arc::new(Unreachable));

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/simulate", json!({ "ethAmount": "0.5" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Simulation failed");
    assert_eq!(body["success"], false);
    assert!(app.history.read_all().await.is_empty());
}

#[tokio::test]
async fn health_and_stats_reflect_activity() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), None, Some(0.1)])));
    send(&app.router, post_json("/api/v1/simulate", json!({ "ethAmount": 2 }))).await;

    let (status, health) = send(&app.router, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "degraded");
    assert_eq!(health["chains_available"], 2);
    assert_eq!(health["chains_total"], 3);
    assert_eq!(health["history_entries"], 2);

    let (status, stats) = send(&app.router, get("/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["cycles_completed"], 1);
    assert_eq!(stats["history_appends"], 2);
    // one miss from the simulate cycle, one from the health check
    assert_eq!(stats["chain_fetch_failures"], 2);
}

#[tokio::test]
async fn simulate_rejects_negative_amount_without_writes() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), Some(30.0), Some(0.1)])));

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/simulate", json!({ "ethAmount": -1 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ethAmount must be a non-negative number");
    assert!(app.history.read_all().await.is_empty());
}

#[tokio::test]
async fn simulate_with_overflowing_amount_marks_rows_failed() {
    let app = app(Arc::new(StaticPrices(vec![Some(50.0), None, Some(100.0)])));

    let (status, body) = send(
        &app.router,
        post_json("/api/v1/simulate", json!({ "ethAmount": 1.7e308 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": [
                { "chain": "Ethereum", "error": "Estimation failed" },
                { "chain": "Polygon", "error": "Gas price unavailable" },
                { "chain": "Arbitrum", "error": "Estimation failed" }
            ]
        })
    );
    assert!(app.history.read_all().await.is_empty());
}

#[tokio::test]
async fn dashboard_socket_streams_snapshots_until_closed() {
    let app = app(Arc::new(StaticPrices(vec![Some(21.5), None, Some(0.01)])));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = app.router.clone();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let (mut socket, _) = connect_async(format!("ws://{}/ws/dashboard", addr))
        .await
        .unwrap();

    let frame = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("no dashboard frame within 5s")
        .unwrap()
        .unwrap();
    let text = frame.to_text().unwrap().to_string();
    assert!(
        text.starts_with(r#"{"prices":{"Ethereum":21.5,"Polygon":null,"Arbitrum":0.01},"timestamp":"#),
        "unexpected frame: {}",
        text
    );
    let update: Value = serde_json::from_str(&text).unwrap();
    assert!(update["timestamp"].is_string());

    socket.send(Message::Close(None)).await.unwrap();

    // Server leaves its loop and drops the connection, ending the stream
    let drained = tokio::time::timeout(Duration::from_secs(5), async {
        while let Some(Ok(_)) = socket.next().await {}
    })
    .await;
    assert!(drained.is_ok(), "dashboard socket stayed open after close");
}
