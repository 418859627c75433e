//! Shared helpers for integration tests: an in-process stand-in for the
//! chat-completion endpoint and app configs pointing at it.

#![allow(dead_code)]

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::routing::post;
use axum::Router;
use jester::AppConfig;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TEST_KEY: &str = "sk-or-test-key";

/// Route the client posts to.
pub const CHAT_PATH: &str = "/api/v1/chat/completions";

/// One request as seen by the mock.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: String,
    pub path: String,
    /// Header names lowercased.
    pub headers: HashMap<String, String>,
    /// `Value::Null` when the body is not JSON.
    pub body: serde_json::Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

/// Answers every request with the same status and body.
pub struct MockChat {
    pub url: String,
    requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockChat {
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.into(),
            requests: Arc::clone(&requests),
        };
        let app = Router::new()
            .route(CHAT_PATH, post(chat_completion))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}{CHAT_PATH}"),
            requests,
        }
    }

    /// Reply 200 with a completion whose content is `text`.
    pub async fn answering(text: &str) -> Self {
        Self::start(200, completion(text)).await
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn app_config(&self) -> AppConfig {
        app_config_for(&self.url)
    }
}

/// Record the request, then reply. Recording first means the capture is
/// visible by the time the client sees the response.
async fn chat_completion(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    state.requests.lock().unwrap().push(CapturedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body: serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null),
    });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
}

pub fn app_config_for(url: &str) -> AppConfig {
    AppConfig::builder()
        .api_key(TEST_KEY)
        .api_url(url)
        .model("test/model")
        .build()
        .unwrap()
}

/// A chat-completion response body carrying `text`.
pub fn completion(text: &str) -> String {
    serde_json::json!({
        "id": "gen-test",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": text}}]
    })
    .to_string()
}

/// A URL on a port nothing listens on.
pub fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}{CHAT_PATH}")
}
