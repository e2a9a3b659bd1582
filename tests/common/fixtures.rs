//! Engine, state and router fixtures

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use poetree::backend::forest::{TreeEngine, DEFAULT_MAX_DEPTH};
use poetree::backend::routes::create_router;
use poetree::backend::server::{build_state, AppState, ServerConfig, Stores};
use poetree::backend::store::{MemoryStore, NodeStore, PoemStore};
use poetree::shared::poetry::AppendNode;
use poetree::shared::{NodeId, PoetryNode};

/// Tree Engine over a fresh in-memory store
pub fn memory_engine() -> (TreeEngine, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    (TreeEngine::new(store.clone(), DEFAULT_MAX_DEPTH), store)
}

/// Application state over a fresh in-memory store
pub fn memory_state() -> AppState {
    build_state(Stores::memory(), ServerConfig::default())
}

/// Application state over the given stores
pub fn state_with(nodes: Arc<dyn NodeStore>, poems: Arc<dyn PoemStore>) -> AppState {
    build_state(Stores { nodes, poems }, ServerConfig::default())
}

/// Router over a fresh in-memory store
pub fn test_app() -> Router {
    create_router(memory_state())
}

/// Test server over a fresh in-memory store
pub fn test_server() -> TestServer {
    TestServer::new(test_app()).expect("start test server")
}

pub fn append(text: &str) -> AppendNode {
    AppendNode {
        text: text.to_string(),
        author: "tester".to_string(),
        is_anonymous: false,
    }
}

pub async fn plant(engine: &TreeEngine, text: &str) -> PoetryNode {
    engine
        .create_root(text.to_string(), "tester".to_string())
        .await
        .expect("plant root")
}

pub async fn grow(engine: &TreeEngine, parent: NodeId, text: &str) -> PoetryNode {
    engine.append_child(parent, append(text)).await.expect("append child")
}

/// Send a request and return status plus raw body text
pub async fn send_raw(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, String) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    (status, String::from_utf8_lossy(&bytes).into_owned())
}

/// Send a request and parse the body as JSON
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, text) = send_raw(app, method, uri, body).await;
    let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
    (status, value)
}

/// Read a node id out of a JSON body
pub fn id_of(body: &Value) -> NodeId {
    body["_id"]
        .as_str()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| panic!("no _id in {body}"))
}
