#![allow(dead_code)]

use serde_json::Value;
use sooru_server::{build_router, ApiConfig, AppState, RecordingPublisher, TokenSigner};
use sooru_store::{MemoryStore, RecordStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const TEST_SECRET: &[u8] = b"contract-test-secret-0123";

pub struct TestServer {
    pub addr: SocketAddr,
    pub events: RecordingPublisher,
}

pub async fn spawn_server() -> TestServer {
    spawn_with(Arc::new(MemoryStore::new()), ApiConfig::default()).await
}

pub async fn spawn_with(store: Arc<dyn RecordStore>, api: ApiConfig) -> TestServer {
    let events = RecordingPublisher::new();
    let signer = TokenSigner::new(TEST_SECRET, api.token_ttl).expect("signer");
    let state = AppState::with_config(store, Arc::new(events.clone()), signer, api);
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    TestServer { addr, events }
}

#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub head: String,
    pub body: String,
}

impl RawResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("json body ({e}): {}", self.body))
    }

    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim()
                .eq_ignore_ascii_case(name)
                .then(|| value.trim().to_string())
        })
    }
}

pub async fn send_raw(
    addr: SocketAddr,
    method: &str,
    path: &str,
    headers: &[(&str, &str)],
    body: Option<&str>,
) -> RawResponse {
    let mut stream = tokio::net::TcpStream::connect(addr)
        .await
        .expect("connect server");
    let mut req = format!("{method} {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n");
    for (name, value) in headers {
        req.push_str(&format!("{name}: {value}\r\n"));
    }
    let body = body.unwrap_or("");
    if !body.is_empty() || matches!(method, "POST" | "PUT") {
        req.push_str("Content-Type: application/json\r\n");
        req.push_str(&format!("Content-Length: {}\r\n", body.len()));
    }
    req.push_str("\r\n");
    req.push_str(body);
    stream
        .write_all(req.as_bytes())
        .await
        .expect("write request");
    let mut response = String::new();
    stream
        .read_to_string(&mut response)
        .await
        .expect("read response");
    let (head, body) = response
        .split_once("\r\n\r\n")
        .expect("http response separator");
    let status = head
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .and_then(|s| s.parse::<u16>().ok())
        .expect("status");
    RawResponse {
        status,
        head: head.to_string(),
        body: body.to_string(),
    }
}

pub async fn call(
    addr: SocketAddr,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> RawResponse {
    let auth = token.map(|t| format!("Bearer {t}"));
    let mut headers = Vec::new();
    if let Some(auth) = auth.as_deref() {
        headers.push(("Authorization", auth));
    }
    let body = body.map(|b| b.to_string());
    send_raw(addr, method, path, &headers, body.as_deref()).await
}

/// Registers a user and returns `(token, user_id)`.
pub async fn register(addr: SocketAddr, name: &str, email: &str) -> (String, String) {
    let resp = call(
        addr,
        "POST",
        "/api/users/register",
        None,
        Some(serde_json::json!({"name": name, "email": email, "password": "hunter22"})),
    )
    .await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    let body = resp.json();
    (
        body["token"].as_str().expect("token").to_string(),
        body["user"]["id"].as_str().expect("user id").to_string(),
    )
}

pub async fn create_project(addr: SocketAddr, token: &str, name: &str) -> String {
    let resp = call(
        addr,
        "POST",
        "/api/projects",
        Some(token),
        Some(serde_json::json!({"project_name": name})),
    )
    .await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    resp.json()["id"].as_str().expect("project id").to_string()
}

pub async fn initialize_plan(
    addr: SocketAddr,
    token: &str,
    project_id: &str,
    width: f64,
    length: f64,
) -> String {
    let resp = call(
        addr,
        "POST",
        "/api/floorplans/initialize",
        Some(token),
        Some(serde_json::json!({
            "plot_width": width,
            "plot_length": length,
            "project_id": project_id,
        })),
    )
    .await;
    assert_eq!(resp.status, 201, "{}", resp.body);
    resp.json()["floor_plan"]["id"]
        .as_str()
        .expect("plan id")
        .to_string()
}
