// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Local document creation endpoint that captures requests and answers
//! with a fixed response.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode},
    routing::post,
    Router,
};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const CREATE_PATH: &str = "/api/v3/lk/documents/create";

/// A request as received by the endpoint.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Captured {
    /// Value of header `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// Fixed answer returned for every request.
#[derive(Debug, Clone, Copy)]
pub struct Reply {
    pub status: u16,
    pub body: &'static str,
}

impl Reply {
    pub fn ok(body: &'static str) -> Self {
        Self { status: 200, body }
    }

    pub fn status(status: u16, body: &'static str) -> Self {
        Self { status, body }
    }
}

#[derive(Clone)]
struct EndpointState {
    reply: Reply,
    captured: Arc<Mutex<Vec<Captured>>>,
}

async fn create(
    State(state): State<EndpointState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    state.captured.lock().unwrap().push(Captured {
        method,
        headers,
        body,
    });

    let status = StatusCode::from_u16(state.reply.status).expect("valid status code");
    (status, state.reply.body)
}

/// A running endpoint. Stops serving when dropped.
pub struct Endpoint {
    pub url: String,
    captured: Arc<Mutex<Vec<Captured>>>,
    task: JoinHandle<()>,
}

impl Endpoint {
    /// Requests received so far, in arrival order.
    pub fn requests(&self) -> Vec<Captured> {
        self.captured.lock().unwrap().clone()
    }
}

impl Drop for Endpoint {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Serve the document creation route on a local port, answering every
/// request with `reply`.
///
/// Must be called from within a tokio runtime.
pub async fn serve(reply: Reply) -> Endpoint {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route(CREATE_PATH, post(create))
        .with_state(EndpointState {
            reply,
            captured: captured.clone(),
        });

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let task = tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve endpoint");
    });

    Endpoint {
        url: format!("http://{addr}{CREATE_PATH}"),
        captured,
        task,
    }
}

/// URL on a port nothing listens on.
pub async fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}{CREATE_PATH}")
}
