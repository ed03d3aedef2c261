// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP submission collaborators.
//!
//! Three interchangeable [`Submitter`]/[`BlockingSubmitter`] implementations
//! POST the payload as JSON to the configured endpoint:
//!
//! - [`HttpSubmitter`] awaits the response and returns its body.
//! - [`DetachedHttpSubmitter`] starts the request on the runtime and returns
//!   [`DISPATCHED`] straight away; the response is logged and optionally
//!   handed to a channel.
//! - [`BlockingHttpSubmitter`] performs the request on the calling thread.
//!
//! None of them retry. A non-success status is reported as
//! [`TransportError::Status`].

use crate::config::EndpointConfig;
use crate::error::TransportError;
use crate::submitter::{BlockingSubmitter, Submitter};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Acknowledgement returned by [`DetachedHttpSubmitter`].
pub const DISPATCHED: &str = "submission dispatched";

const JSON: &str = "application/json";

/// Headers sent with every submission.
pub fn request_headers(endpoint: &EndpointConfig) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));

    if let Some(token) = &endpoint.auth_token {
        let name = HeaderName::from_bytes(endpoint.auth_header.as_bytes()).map_err(|e| {
            TransportError::InvalidHeader {
                name: endpoint.auth_header.clone(),
                reason: e.to_string(),
            }
        })?;
        let mut value =
            HeaderValue::from_str(token).map_err(|e| TransportError::InvalidHeader {
                name: endpoint.auth_header.clone(),
                reason: e.to_string(),
            })?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}

fn into_body(status: StatusCode, body: String) -> Result<String, TransportError> {
    if status.is_success() {
        Ok(body)
    } else {
        Err(TransportError::Status { status, body })
    }
}

/// Sends the document and waits for the endpoint's answer.
#[derive(Debug, Clone)]
pub struct HttpSubmitter {
    client: reqwest::Client,
    endpoint: EndpointConfig,
}

impl HttpSubmitter {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: EndpointConfig) -> Self {
        Self { client, endpoint }
    }

    /// Build the POST request for `payload` without sending it.
    pub fn build_request<P>(&self, payload: &P) -> Result<reqwest::Request, TransportError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload)?;
        let request = self
            .client
            .post(&self.endpoint.url)
            .headers(request_headers(&self.endpoint)?)
            .body(body)
            .build()?;
        Ok(request)
    }

    /// Send an already built request and read the response body.
    pub async fn execute(&self, request: reqwest::Request) -> Result<String, TransportError> {
        debug!(url = %request.url(), "Sending document");
        let response = self.client.execute(request).await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(%status, "Endpoint responded");
        into_body(status, body)
    }

    pub async fn send<P>(&self, payload: &P) -> Result<String, TransportError>
    where
        P: Serialize + Sync + ?Sized,
    {
        let request = self.build_request(payload)?;
        self.execute(request).await
    }
}

impl<P> Submitter<P> for HttpSubmitter
where
    P: Serialize + Send + Sync,
{
    type Output = String;
    type Error = TransportError;

    fn submit(&self, payload: P) -> impl Future<Output = Result<String, TransportError>> + Send {
        async move { self.send(&payload).await }
    }
}

/// Outcome of a detached submission.
#[derive(Debug)]
pub struct Delivery {
    pub result: Result<String, TransportError>,
}

/// Fires the request and returns an acknowledgement without waiting for the
/// response.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Clone)]
pub struct DetachedHttpSubmitter {
    inner: Arc<HttpSubmitter>,
    delivery: Option<mpsc::UnboundedSender<Delivery>>,
}

impl DetachedHttpSubmitter {
    pub fn new(inner: HttpSubmitter) -> Self {
        Self {
            inner: Arc::new(inner),
            delivery: None,
        }
    }

    /// Also send each eventual outcome to `tx`.
    pub fn with_delivery(mut self, tx: mpsc::UnboundedSender<Delivery>) -> Self {
        self.delivery = Some(tx);
        self
    }
}

impl<P> Submitter<P> for DetachedHttpSubmitter
where
    P: Serialize + Send,
{
    type Output = String;
    type Error = TransportError;

    fn submit(&self, payload: P) -> impl Future<Output = Result<String, TransportError>> + Send {
        // Serialization problems are reported to the caller, not out-of-band.
        let request = self.inner.build_request(&payload);
        let inner = self.inner.clone();
        let delivery = self.delivery.clone();

        async move {
            let request = request?;
            tokio::spawn(async move {
                let result = inner.execute(request).await;
                match &result {
                    Ok(_) => debug!("Detached submission completed"),
                    Err(e) => error!(error = %e, "Detached submission failed"),
                }
                if let Some(tx) = delivery {
                    // Receiver gone means nobody is listening any more.
                    let _ = tx.send(Delivery { result });
                }
            });
            Ok(DISPATCHED.to_string())
        }
    }
}

/// Sends the document on the calling thread. For use with
/// [`crate::BlockingGate`]; do not create it inside an async runtime.
#[derive(Debug, Clone)]
pub struct BlockingHttpSubmitter {
    client: reqwest::blocking::Client,
    endpoint: EndpointConfig,
}

impl BlockingHttpSubmitter {
    pub fn new(endpoint: EndpointConfig) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            endpoint,
        }
    }

    pub fn send<P>(&self, payload: &P) -> Result<String, TransportError>
    where
        P: Serialize + ?Sized,
    {
        let body = serde_json::to_vec(payload)?;
        let response = self
            .client
            .post(&self.endpoint.url)
            .headers(request_headers(&self.endpoint)?)
            .body(body)
            .send()?;
        let status = response.status();
        into_body(status, response.text()?)
    }
}

impl<P> BlockingSubmitter<P> for BlockingHttpSubmitter
where
    P: Serialize,
{
    type Output = String;
    type Error = TransportError;

    fn submit(&self, payload: P) -> Result<String, TransportError> {
        self.send(&payload)
    }
}
