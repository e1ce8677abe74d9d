//! Outbound transport to recipients.
//!
//! [`BidTransport`] is the seam between the dispatcher and the network. The
//! production implementation posts JSON over a pooled `hyper-util` client;
//! tests plug in in-memory transports.

use std::future::Future;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    http::{header, Method, Request, Response, StatusCode},
};
use hyper::body::Incoming;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use thiserror::Error;

use crate::auction::types::BidResponse;
use crate::config::schema::TimeoutConfig;
use crate::recipients::set::Recipient;

/// Replies larger than this are treated as unreachable recipients.
const MAX_REPLY_BYTES: usize = 64 * 1024;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Per-recipient failures. Always absorbed by the dispatcher.
#[derive(Debug, Error)]
pub enum RecipientError {
    /// Connection, send or body read failed.
    #[error("recipient unreachable: {0}")]
    Unreachable(#[source] BoxError),

    /// Recipient answered with a non-2xx status.
    #[error("recipient answered with status {0}")]
    Status(StatusCode),

    /// No reply before the per-call deadline.
    #[error("recipient did not answer within {0:?}")]
    Timeout(Duration),

    /// Reply body is not a bid response.
    #[error("malformed recipient reply: {0}")]
    MalformedReply(#[source] serde_json::Error),
}

/// Sends one serialized bid request to one recipient.
pub trait BidTransport: Send + Sync + 'static {
    fn post_bid(
        &self,
        recipient: &Recipient,
        body: Bytes,
    ) -> impl Future<Output = Result<BidResponse, RecipientError>> + Send;
}

/// HTTP transport backed by a shared connection pool.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client<HttpConnector, Body>,
}

impl HttpTransport {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_millis(timeouts.connect_ms)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_secs(timeouts.idle_secs))
            .pool_max_idle_per_host(timeouts.max_idle_per_host)
            .build(connector);

        Self { client }
    }
}

impl BidTransport for HttpTransport {
    async fn post_bid(&self, recipient: &Recipient, body: Bytes) -> Result<BidResponse, RecipientError> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(recipient.uri().clone())
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .map_err(|e| RecipientError::Unreachable(Box::new(e)))?;

        let response: Response<Incoming> = self
            .client
            .request(request)
            .await
            .map_err(|e| RecipientError::Unreachable(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecipientError::Status(status));
        }

        let reply = axum::body::to_bytes(Body::new(response.into_body()), MAX_REPLY_BYTES)
            .await
            .map_err(|e| RecipientError::Unreachable(Box::new(e)))?;

        serde_json::from_slice(&reply).map_err(RecipientError::MalformedReply)
    }
}
