//! In-process stub of the reqres user/login endpoints
//!
//! The stub answers with the same status codes and body shapes as the public
//! service so the suite can run offline. It is spawned on a loopback port,
//! health checked before use, and shut down when its handle is dropped.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::API_KEY_HEADER;
use crate::error::{E2eError, E2eResult};

/// Configuration for the stub service
#[derive(Debug, Clone)]
pub struct StubConfig {
    /// Port to listen on (None = any free port)
    pub port: Option<u16>,

    /// Path prefix the endpoints are mounted under
    pub base_path: String,

    /// Timeout for startup health checks
    pub startup_timeout: Duration,

    /// When set, requests without this `x-api-key` are rejected with 401
    pub required_api_key: Option<String>,

    /// Known accounts: email -> token
    pub accounts: BTreeMap<String, String>,
}

impl Default for StubConfig {
    fn default() -> Self {
        let mut accounts = BTreeMap::new();
        accounts.insert("eve.holt@reqres.in".to_string(), "QpwL5tke4Pnpja7X4".to_string());
        accounts.insert("janet.weaver@reqres.in".to_string(), "Xk2vJ9qTn4LmWp8Rz".to_string());
        Self {
            port: None,
            base_path: "/api".to_string(),
            startup_timeout: Duration::from_secs(10),
            required_api_key: None,
            accounts,
        }
    }
}

/// A request as seen by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub path: String,
    pub api_key: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Clone)]
struct StubState {
    config: Arc<StubConfig>,
    next_id: Arc<AtomicU64>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Handle to a running stub
pub struct StubHandle {
    base_url: String,
    port: u16,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StubHandle {
    /// Spawn the stub on the current tokio runtime
    pub async fn spawn(config: StubConfig) -> E2eResult<Self> {
        let addr = SocketAddr::from(([127, 0, 0, 1], config.port.unwrap_or(0)));
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| E2eError::StubStartup(format!("Failed to bind {}: {}", addr, e)))?;
        let port = listener.local_addr()?.port();
        let base_url = format!("http://127.0.0.1:{}", port);

        info!("Spawning reqres stub on port {}", port);

        let startup_timeout = config.startup_timeout;
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            config: Arc::new(config),
            next_id: Arc::new(AtomicU64::new(1)),
            requests: requests.clone(),
        };
        let app = router(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
            if let Err(e) = served {
                warn!("Stub server error: {}", e);
            }
        });

        let handle = StubHandle {
            base_url,
            port,
            requests,
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };

        handle.wait_for_healthy(startup_timeout).await?;

        info!("Stub is healthy at {}", handle.base_url);
        Ok(handle)
    }

    /// Wait for the stub to respond to health checks
    async fn wait_for_healthy(&self, timeout_duration: Duration) -> E2eResult<()> {
        let health_url = format!("{}/health", self.base_url);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(2))
            .build()?;

        let start = std::time::Instant::now();
        let mut attempts = 0;

        while start.elapsed() < timeout_duration {
            attempts += 1;

            match client.get(&health_url).send().await {
                Ok(resp) if resp.status().is_success() => return Ok(()),
                Ok(resp) => warn!("Health check returned {}", resp.status()),
                Err(e) => {
                    // Connection refused is expected while the listener spins up
                    if !e.is_connect() {
                        warn!("Health check error: {}", e);
                    }
                }
            }

            sleep(Duration::from_millis(50)).await;
        }

        Err(E2eError::StubHealthCheck(attempts))
    }

    /// Base URI (scheme and authority) of the stub
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Requests received so far, health checks excluded
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Stop the stub
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            debug!("Stopping stub on port {}", self.port);
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for StubHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

fn router(state: StubState) -> Router {
    let base = state.config.base_path.trim_end_matches('/').to_string();
    Router::new()
        .route("/health", get(health))
        .route(&format!("{}/login", base), post(login))
        .route(&format!("{}/users", base), post(create_user))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn login(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = state.record("/login", &headers, &body);
    if let Some(rejection) = state.check_api_key(&headers) {
        return rejection;
    }

    let Some(fields) = parse_object(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing email or username");
    };
    let Some(email) = non_empty_str(&fields, "email") else {
        return error_response(StatusCode::BAD_REQUEST, "Missing email or username");
    };
    if non_empty_str(&fields, "password").is_none() {
        return error_response(StatusCode::BAD_REQUEST, "Missing password");
    }

    match state.config.accounts.get(email) {
        Some(token) => (StatusCode::OK, Json(json!({ "token": token }))).into_response(),
        None => error_response(StatusCode::BAD_REQUEST, "user not found"),
    }
}

async fn create_user(State(state): State<StubState>, headers: HeaderMap, body: Bytes) -> Response {
    let body = state.record("/users", &headers, &body);
    if let Some(rejection) = state.check_api_key(&headers) {
        return rejection;
    }

    let Some(mut fields) = parse_object(&body) else {
        return error_response(StatusCode::BAD_REQUEST, "Body must be a JSON object");
    };
    let id = state.next_id.fetch_add(1, Ordering::Relaxed);
    fields.insert("id".to_string(), Value::String(id.to_string()));
    fields.insert(
        "createdAt".to_string(),
        Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
    );

    (StatusCode::CREATED, Json(Value::Object(fields))).into_response()
}

impl StubState {
    fn record(&self, path: &str, headers: &HeaderMap, body: &Bytes) -> String {
        let text = String::from_utf8_lossy(body).into_owned();
        self.requests.lock().push(RecordedRequest {
            path: path.to_string(),
            api_key: header_str(headers, API_KEY_HEADER),
            content_type: header_str(headers, "content-type"),
            body: text.clone(),
        });
        text
    }

    fn check_api_key(&self, headers: &HeaderMap) -> Option<Response> {
        let required = self.config.required_api_key.as_deref()?;
        match header_str(headers, API_KEY_HEADER) {
            Some(key) if key == required => None,
            _ => Some(error_response(StatusCode::UNAUTHORIZED, "Missing API key")),
        }
    }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn parse_object(body: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn non_empty_str<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object() {
        assert!(parse_object(r#"{"email":"a"}"#).is_some());
        assert!(parse_object("[1,2]").is_none());
        assert!(parse_object("").is_none());
    }

    #[test]
    fn test_non_empty_str() {
        let fields = parse_object(r#"{"email":"","password":"x","n":1}"#).unwrap();
        assert_eq!(non_empty_str(&fields, "email"), None);
        assert_eq!(non_empty_str(&fields, "password"), Some("x"));
        assert_eq!(non_empty_str(&fields, "n"), None);
    }

    #[tokio::test]
    async fn test_spawn_and_health() {
        let stub = StubHandle::spawn(StubConfig::default()).await.unwrap();
        assert!(stub.port() > 0);
        let resp = reqwest::get(format!("{}/health", stub.base_url())).await.unwrap();
        assert!(resp.status().is_success());
        assert!(stub.requests().is_empty());
    }
}
