//! QuickStats client tests against an in-process HTTP server.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use indexmap::IndexMap;
use serde_json::json;

use cropstat_core::{config::ApiConfig, FetchClient, FetchError, QuickStatsClient};

/// Canned reply for the fake API.
#[derive(Clone)]
struct Reply {
    status: StatusCode,
    body: String,
}

#[derive(Clone)]
struct FakeApi {
    reply: Reply,
    queries: Arc<Mutex<Vec<String>>>,
}

async fn api_get(State(api): State<FakeApi>, RawQuery(query): RawQuery) -> impl IntoResponse {
    api.queries.lock().unwrap().push(query.unwrap_or_default());
    (api.reply.status, api.reply.body.clone())
}

async fn spawn_api(status: StatusCode, body: String) -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
    let queries = Arc::new(Mutex::new(Vec::new()));
    let state = FakeApi {
        reply: Reply { status, body },
        queries: queries.clone(),
    };
    let app = Router::new()
        .route("/api/api_GET/", get(api_get))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, queries)
}

fn client_for(addr: SocketAddr) -> QuickStatsClient {
    QuickStatsClient::new(&ApiConfig {
        base_url: format!("http://{}/api", addr),
        api_key: Some("test-key".to_string()),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
}

fn corn_params() -> IndexMap<String, String> {
    IndexMap::from([
        ("commodity_desc".to_string(), "CORN".to_string()),
        ("statisticcat_desc".to_string(), "AREA HARVESTED".to_string()),
    ])
}

#[tokio::test]
async fn test_fetch_returns_data_and_sends_query() {
    let body = json!({"data": [
        {"state_name": "IOWA", "year": 1990, "Value": "12,400,000"},
        {"state_name": "OHIO", "year": 1990, "Value": "5,400,000"},
    ]});
    let (addr, queries) = spawn_api(StatusCode::OK, body.to_string()).await;

    let records = client_for(addr)
        .fetch(&corn_params(), 1990, 2024)
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["state_name"], "IOWA");
    assert_eq!(
        queries.lock().unwrap().as_slice(),
        ["key=test-key&format=JSON&year__GE=1990&year__LE=2024\
          &commodity_desc=CORN&statisticcat_desc=AREA%20HARVESTED"]
    );
}

#[tokio::test]
async fn test_fetch_empty_object_is_no_records() {
    let (addr, _) = spawn_api(StatusCode::OK, "{}".to_string()).await;

    let records = client_for(addr).fetch(&corn_params(), 1950, 2025).await.unwrap();

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_fetch_error_field_is_api_error() {
    let body = json!({"error": ["invalid commodity"]}).to_string();
    let (addr, _) = spawn_api(StatusCode::BAD_REQUEST, body).await;

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ApiError(ref msg) if msg == "invalid commodity"));
}

#[tokio::test]
async fn test_fetch_error_field_with_ok_status() {
    let body = json!({"error": "exceeds limit=50000"}).to_string();
    let (addr, _) = spawn_api(StatusCode::OK, body).await;

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "NASS API error: exceeds limit=50000");
}

#[tokio::test]
async fn test_fetch_non_json_failure_is_status_error() {
    let (addr, _) = spawn_api(StatusCode::SERVICE_UNAVAILABLE, "upstream down".to_string()).await;

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchError::StatusError { status: 503, ref message } if message == "upstream down"
    ));
}

#[tokio::test]
async fn test_fetch_garbage_body_is_parse_error() {
    let (addr, _) = spawn_api(StatusCode::OK, "<html>".to_string()).await;

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::ParseError(_)));
}

#[tokio::test]
async fn test_unreachable_host_is_http_error() {
    // Bind then drop so the port is very likely closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::HttpError(_)));
}

#[tokio::test]
async fn test_transport_error_does_not_leak_api_key() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client_for(addr)
        .fetch(&corn_params(), 1950, 2025)
        .await
        .unwrap_err();

    let mut rendered = format!("{} {:?}", err, err);
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    assert!(!rendered.contains("test-key"), "key leaked: {}", rendered);
    assert!(!rendered.contains("key="), "query leaked: {}", rendered);
}
