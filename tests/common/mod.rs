//! Helpers shared by the integration tests: an in-memory app and a fake
//! upstream that speaks JSON-RPC, the pinning API and the IP registry API.
#![allow(dead_code)]

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use stakemarket::config::AppConfig;
use stakemarket::{create_app, db, AppState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;
use tower::ServiceExt;

static INIT: Once = Once::new();

pub const FUNDING_CONTRACT: &str = "0x1111111111111111111111111111111111111111";
pub const DEPLOYED_CONTRACT: &str = "0x2222222222222222222222222222222222222222";
pub const STAKER: &str = "0x3333333333333333333333333333333333333333";
pub const IP_ASSET_ID: &str = "0x4444444444444444444444444444444444444444";
pub const IP_ASSET_CONTRACT: &str = "0x5555555555555555555555555555555555555555";
pub const TX_HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
pub const PINNED_CID: &str = "bafkreigh2akiscaildcqabsyg3dfr6chu3fgpregiymsck7e7aqa4s52zy";
/// 5000 ether in wei
pub const BALANCE_5000_ETH: &str = "0x10f0cf064dd59200000";

pub fn setup() {
    INIT.call_once(|| {
        // Initialize tracing for tests - only once
        let _ = tracing_subscriber::fmt::try_init();
    });
}

#[derive(Clone)]
pub struct FakeUpstream {
    pub balance_hex: &'static str,
    /// Receipt lookups answered with `null` before the receipt appears
    pub pending_polls: usize,
    pub receipt_status: &'static str,
    pub receipt_polls: Arc<AtomicUsize>,
    pub pins: Arc<AtomicUsize>,
    pub registrations: Arc<AtomicUsize>,
    pub fail_registry: bool,
}

impl Default for FakeUpstream {
    fn default() -> Self {
        Self {
            balance_hex: BALANCE_5000_ETH,
            pending_polls: 0,
            receipt_status: "0x1",
            receipt_polls: Arc::new(AtomicUsize::new(0)),
            pins: Arc::new(AtomicUsize::new(0)),
            registrations: Arc::new(AtomicUsize::new(0)),
            fail_registry: false,
        }
    }
}

async fn rpc(State(fake): State<FakeUpstream>, Json(req): Json<Value>) -> Json<Value> {
    let id = req["id"].clone();
    let result = match req["method"].as_str() {
        Some("eth_getBalance") => json!(fake.balance_hex),
        Some("eth_getTransactionReceipt") => {
            let polls = fake.receipt_polls.fetch_add(1, Ordering::SeqCst);
            if polls < fake.pending_polls {
                Value::Null
            } else {
                json!({
                    "transactionHash": req["params"][0],
                    "blockNumber": "0x10",
                    "from": STAKER,
                    "to": null,
                    "contractAddress": DEPLOYED_CONTRACT,
                    "status": fake.receipt_status,
                })
            }
        }
        _ => {
            return Json(json!({
                "jsonrpc": "2.0",
                "id": id,
                "error": { "code": -32601, "message": "method not found" },
            }))
        }
    };
    Json(json!({ "jsonrpc": "2.0", "id": id, "result": result }))
}

async fn pin(State(fake): State<FakeUpstream>, Json(body): Json<Value>) -> Json<Value> {
    assert!(body.get("pinataContent").is_some());
    fake.pins.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "IpfsHash": PINNED_CID, "PinSize": 512, "Timestamp": "2026-10-16T00:00:00Z" }))
}

async fn register(State(fake): State<FakeUpstream>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    fake.registrations.fetch_add(1, Ordering::SeqCst);
    if fake.fail_registry {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "registry down" })));
    }
    assert!(body["metadataUri"].as_str().unwrap_or_default().ends_with(PINNED_CID));
    (
        StatusCode::OK,
        Json(json!({
            "ipId": IP_ASSET_ID,
            "contractAddress": IP_ASSET_CONTRACT,
            "chainId": 1315,
            "txHash": TX_HASH,
        })),
    )
}

/// Serve the fake upstream on an ephemeral port and return its base URL.
pub async fn spawn_upstream(fake: FakeUpstream) -> String {
    let app = Router::new()
        .route("/rpc", post(rpc))
        .route("/pinning/pinJSONToIPFS", post(pin))
        .route("/ip-assets", post(register))
        .with_state(fake);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Config pointing every integration at the fake upstream.
pub fn upstream_config(base_url: &str) -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        chain_rpc_url: Some(format!("{}/rpc", base_url)),
        receipt_timeout: Duration::from_secs(5),
        pinning_api_url: Some(base_url.to_string()),
        pinning_jwt: Some("test-jwt".to_string()),
        ipfs_gateway_url: "https://gateway.test".to_string(),
        ip_registry_url: Some(base_url.to_string()),
        ..AppConfig::default()
    }
}

pub async fn state_with(config: AppConfig) -> AppState {
    setup();
    let db = db::connect("sqlite::memory:").await.unwrap();
    AppState::new(db, config)
}

pub async fn offline_state() -> AppState {
    state_with(AppConfig::default()).await
}

pub async fn app_with(config: AppConfig) -> (Router, AppState) {
    let state = state_with(config).await;
    (create_app(state.clone()), state)
}

pub async fn offline_app() -> (Router, AppState) {
    app_with(AppConfig::default()).await
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

pub async fn create_artist(app: &Router) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/artists",
        Some(json!({ "name": "Nova Lane", "genre": "electronic", "bio": "Synth records" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["id"].as_i64().unwrap()
}

pub async fn create_project(app: &Router, artist_id: i64, extra: Value) -> Value {
    let mut request = json!({
        "artist_id": artist_id,
        "title": "Debut Album",
        "description": "Ten tracks",
        "category": "music",
        "funding_target": 100000.0,
        "milestones_total": 3,
    });
    if let (Some(base), Some(extra)) = (request.as_object_mut(), extra.as_object()) {
        for (k, v) in extra {
            base.insert(k.clone(), v.clone());
        }
    }
    let (status, body) = send(app, "POST", "/projects", Some(request)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body
}
