#![allow(dead_code)]

use std::path::Path;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use reeltomp3::app::create_app;
use reeltomp3::config::settings::AppConfig;
use reeltomp3::state::AppState;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::form_urlencoded;
use wiremock::MockServer;

/// Config pointed at a mock Instagram, with the mock host allow-listed.
pub fn config_for(server: &MockServer, temp_root: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.instagram_base_url = server.uri();
    config.instagram_api_base_url = server.uri();
    config.temp_root = temp_root.to_path_buf();
    config.allowed_media_hosts.push("127.0.0.1".to_string());
    config
}

pub fn state(config: AppConfig) -> AppState {
    AppState::new(config).unwrap()
}

pub fn with_url(path: &str, url: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("url", url)
        .finish();
    format!("{}?{}", path, query)
}

pub async fn get(state: &AppState, uri: &str) -> Response {
    create_app(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn text(response: Response) -> (StatusCode, String) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, String::from_utf8(bytes).unwrap())
}

/// One-shot HTTP server answering every connection with `response` verbatim.
/// Covers upstream replies wiremock cannot produce, such as a body without a
/// `Content-Type`.
pub async fn raw_http_server(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}", addr)
}

/// Polls until the conversion temp root is empty; removal of a finished
/// download's dir runs on the blocking pool.
pub async fn wait_until_empty(root: &Path) -> bool {
    for _ in 0..100 {
        if leftover_entries(root).is_empty() {
            return true;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    false
}

/// Every entry left in the conversion temp root.
pub fn leftover_entries(root: &Path) -> Vec<String> {
    std::fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}
