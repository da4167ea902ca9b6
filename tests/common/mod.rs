//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_relay::config::RelayConfig;
use api_relay::http::HttpServer;
use api_relay::lifecycle::Shutdown;
use axum::{
    body::{to_bytes, Body, Bytes},
    http::{
        header::{CONTENT_TYPE, LOCATION},
        HeaderMap, Request, StatusCode,
    },
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;

/// What a stub upstream saw.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[allow(dead_code)]
impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// A stub upstream bound to an ephemeral port.
#[allow(dead_code)]
pub struct StubUpstream {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl StubUpstream {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("stub upstream received no requests")
    }
}

/// Start a stub upstream that records every request and answers with a fixed response.
pub async fn start_stub_upstream(
    status: u16,
    content_type: &'static str,
    body: &'static str,
) -> StubUpstream {
    let status = StatusCode::from_u16(status).unwrap();
    start_recording_upstream(move || (status, [(CONTENT_TYPE, content_type)], body).into_response())
        .await
}

/// Start a stub upstream that answers every request with `302 Found` to `location`.
#[allow(dead_code)]
pub async fn start_redirecting_upstream(location: String) -> StubUpstream {
    start_recording_upstream(move || {
        (StatusCode::FOUND, [(LOCATION, location.clone())], "").into_response()
    })
    .await
}

async fn start_recording_upstream<F>(respond: F) -> StubUpstream
where
    F: Fn() -> Response + Clone + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let app = Router::new().fallback(move |request: Request<Body>| {
        let recorded = recorded.clone();
        let respond = respond.clone();
        async move {
            let (parts, body_stream) = request.into_parts();
            let bytes = to_bytes(body_stream, usize::MAX).await.unwrap_or_default();
            recorded.lock().unwrap().push(RecordedRequest {
                method: parts.method.to_string(),
                path: parts.uri.path().to_string(),
                query: parts.uri.query().map(str::to_string),
                headers: parts.headers,
                body: bytes,
            });

            respond()
        }
    });

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    StubUpstream { addr, requests }
}

/// Start a backend that accepts connections and never answers.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        let _socket = socket;
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// An address nothing listens on.
#[allow(dead_code)]
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Config pointing at `base_url` with a test credential.
pub fn relay_config(base_url: &str) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.base_url = base_url.to_string();
    config.upstream.api_key = Some("test-key".to_string());
    config.upstream.timeout_secs = 5;
    config.llm.timeout_secs = 5;
    config.timeouts.request_secs = 10;
    config
}

/// A running relay; shut down on drop.
pub struct RelayHandle {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl RelayHandle {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for RelayHandle {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_relay(config: RelayConfig) -> RelayHandle {
    start_server(HttpServer::new(config).unwrap()).await
}

pub async fn start_server(server: HttpServer) -> RelayHandle {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    RelayHandle { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
