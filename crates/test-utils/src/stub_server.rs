//! In-process HTTP server that answers with canned bodies.
//!
//! Binds `127.0.0.1:0`, so tests never touch the network and never fight
//! over ports. Every request is recorded for later assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::task::JoinHandle;

/// A canned answer for one path.
#[derive(Debug, Clone)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubResponse {
    pub fn json(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "application/json;charset=UTF-8",
            body: body.into(),
            delay: None,
        }
    }

    pub fn xml(body: impl Into<String>) -> Self {
        Self {
            status: 200,
            content_type: "text/xml;charset=UTF-8",
            body: body.into(),
            delay: None,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: String::new(),
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// One request the stub received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: HashMap<String, String>,
}

struct Shared {
    routes: HashMap<String, StubResponse>,
    requests: Mutex<Vec<RecordedRequest>>,
}

/// Builder for [`StubServer`].
#[derive(Default)]
pub struct StubServerBuilder {
    routes: HashMap<String, StubResponse>,
}

impl StubServerBuilder {
    pub fn route(mut self, path: &str, response: StubResponse) -> Self {
        self.routes.insert(path.to_string(), response);
        self
    }

    pub async fn spawn(self) -> StubServer {
        let shared = Arc::new(Shared {
            routes: self.routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(answer).with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind stub server");
        let addr = listener.local_addr().expect("Stub server has no address");

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        StubServer {
            addr,
            shared,
            handle,
        }
    }
}

/// A running stub server. Stops when dropped.
pub struct StubServer {
    addr: SocketAddr,
    shared: Arc<Shared>,
    handle: JoinHandle<()>,
}

impl StubServer {
    pub fn builder() -> StubServerBuilder {
        StubServerBuilder::default()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// All requests received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.shared
            .requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Requests received for one path.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn answer(
    State(shared): State<Arc<Shared>>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().to_string();
    if let Ok(mut requests) = shared.requests.lock() {
        requests.push(RecordedRequest {
            path: path.clone(),
            query,
        });
    }

    let Some(stub) = shared.routes.get(&path).cloned() else {
        return (StatusCode::NOT_FOUND, "no stub for path").into_response();
    };

    if let Some(delay) = stub.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(stub.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, stub.content_type)], stub.body).into_response()
}
