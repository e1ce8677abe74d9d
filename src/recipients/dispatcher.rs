//! Concurrent fan-out to recipients.
//!
//! # Responsibilities
//! - Serialize the normalized request once and send the same bytes everywhere
//! - Run one task per recipient, each under its own deadline
//!   (measured from the start of the dispatch, not from when the task runs)
//! - Collect successful replies in arrival order
//! - Absorb per-recipient failures (logged and counted, never propagated)
//!
//! Total latency is bounded by the per-call deadline, not by the sum of the
//! recipients' latencies.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::body::Bytes;
use serde::Serialize;
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Instant};

use crate::auction::types::{AuctionError, BidRequest, BidResponse};
use crate::observability::metrics;
use crate::recipients::set::RecipientSet;
use crate::recipients::transport::{BidTransport, HttpTransport, RecipientError};

/// What happened to one recipient call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientOutcome {
    Answered,
    Unreachable,
    Timeout,
    MalformedReply,
}

impl RecipientOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientOutcome::Answered => "answered",
            RecipientOutcome::Unreachable => "unreachable",
            RecipientOutcome::Timeout => "timeout",
            RecipientOutcome::MalformedReply => "malformed_reply",
        }
    }
}

impl From<&RecipientError> for RecipientOutcome {
    fn from(error: &RecipientError) -> Self {
        match error {
            RecipientError::Unreachable(_) | RecipientError::Status(_) => RecipientOutcome::Unreachable,
            RecipientError::Timeout(_) => RecipientOutcome::Timeout,
            RecipientError::MalformedReply(_) => RecipientOutcome::MalformedReply,
        }
    }
}

/// Outcome of one recipient call, for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientReport {
    pub recipient: usize,
    pub endpoint: String,
    pub outcome: RecipientOutcome,
    pub elapsed_ms: u64,
}

/// Everything a dispatch produced.
#[derive(Debug, Default)]
pub struct Dispatch {
    /// Successful replies, in arrival order.
    pub responses: Vec<BidResponse>,
    /// One report per recipient, in completion order.
    pub reports: Vec<RecipientReport>,
}

/// Fans a bid request out to every recipient.
pub struct Dispatcher<T = HttpTransport> {
    transport: Arc<T>,
    deadline: Duration,
}

impl<T> Dispatcher<T>
where
    T: BidTransport,
{
    pub fn new(transport: T, deadline: Duration) -> Self {
        Self {
            transport: Arc::new(transport),
            deadline,
        }
    }

    /// Send `request` to every recipient and wait until each call has either
    /// answered or hit its deadline.
    pub async fn dispatch(
        &self,
        request: &BidRequest,
        recipients: &RecipientSet,
    ) -> Result<Dispatch, AuctionError> {
        let body = Bytes::from(serde_json::to_vec(request).map_err(AuctionError::Encoding)?);

        let collected = Arc::new(Mutex::new(Vec::with_capacity(recipients.len())));
        let mut calls = JoinSet::new();
        let dispatched = Instant::now();
        let deadline_at = dispatched + self.deadline;

        for recipient in recipients.iter() {
            let recipient = recipient.clone();
            let transport = self.transport.clone();
            let collected = collected.clone();
            let body = body.clone();
            let deadline = self.deadline;

            calls.spawn(async move {
                let result = match timeout_at(deadline_at, transport.post_bid(&recipient, body)).await {
                    Ok(result) => result,
                    Err(_) => Err(RecipientError::Timeout(deadline)),
                };

                let outcome = match result {
                    Ok(response) => {
                        collected
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .push(response);
                        RecipientOutcome::Answered
                    }
                    Err(e) => {
                        tracing::warn!(
                            recipient = %recipient,
                            error = %e,
                            "Recipient dropped from auction"
                        );
                        RecipientOutcome::from(&e)
                    }
                };

                let endpoint = recipient.to_string();
                metrics::record_recipient_call(&endpoint, outcome.as_str());

                RecipientReport {
                    recipient: recipient.index(),
                    endpoint,
                    outcome,
                    elapsed_ms: dispatched.elapsed().as_millis() as u64,
                }
            });
        }

        let mut reports = Vec::with_capacity(recipients.len());
        while let Some(joined) = calls.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => tracing::error!(error = %e, "Recipient task failed"),
            }
        }

        let responses = std::mem::take(&mut *collected.lock().unwrap_or_else(PoisonError::into_inner));

        tracing::debug!(
            recipients = recipients.len(),
            collected = responses.len(),
            "Dispatch finished"
        );

        Ok(Dispatch { responses, reports })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipients::set::Recipient;
    use std::collections::HashSet;

    /// Answers with the recipient's index as `recip_id` after a per-index delay.
    struct ScriptedTransport {
        delays: Vec<Option<Duration>>,
    }

    impl BidTransport for ScriptedTransport {
        async fn post_bid(&self, recipient: &Recipient, body: Bytes) -> Result<BidResponse, RecipientError> {
            let request: BidRequest = serde_json::from_slice(&body).map_err(RecipientError::MalformedReply)?;
            match self.delays.get(recipient.index()).copied().flatten() {
                Some(delay) => {
                    tokio::time::sleep(delay).await;
                    Ok(BidResponse {
                        recipient_id: recipient.index() as i32,
                        id: request.id,
                        message: String::new(),
                        bid: request.min_price + recipient.index() as f64,
                    })
                }
                None => std::future::pending().await,
            }
        }
    }

    /// Every call fails the same way.
    struct FailingTransport;

    impl BidTransport for FailingTransport {
        async fn post_bid(&self, _recipient: &Recipient, _body: Bytes) -> Result<BidResponse, RecipientError> {
            Err(RecipientError::Status(axum::http::StatusCode::BAD_GATEWAY))
        }
    }

    fn recipients(count: usize) -> RecipientSet {
        let ports: Vec<String> = (0..count).map(|i| (20_000 + i).to_string()).collect();
        RecipientSet::parse(&ports.join(","), "localhost", "/bid").unwrap()
    }

    fn request() -> BidRequest {
        BidRequest {
            id: "auction-1".into(),
            min_price: 1.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_slow_and_silent_recipients_are_cut_at_deadline() {
        let transport = ScriptedTransport {
            delays: vec![
                Some(Duration::from_millis(10)),
                Some(Duration::from_millis(200)),
                None,
            ],
        };
        let dispatcher = Dispatcher::new(transport, Duration::from_millis(100));

        let started = Instant::now();
        let dispatch = dispatcher.dispatch(&request(), &recipients(3)).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed >= Duration::from_millis(100), "returned before deadline: {elapsed:?}");
        assert!(elapsed < Duration::from_millis(190), "waited for slow recipient: {elapsed:?}");
        assert_eq!(dispatch.responses.len(), 1);
        assert_eq!(dispatch.responses[0].recipient_id, 0);
        assert_eq!(dispatch.responses[0].id, "auction-1");

        let timeouts = dispatch
            .reports
            .iter()
            .filter(|r| r.outcome == RecipientOutcome::Timeout)
            .count();
        assert_eq!(timeouts, 2);
        assert_eq!(dispatch.reports.len(), 3);
    }

    /// Recipient 0 blocks the runtime thread before answering; the rest never answer.
    struct BlockingFirstTransport {
        block: Duration,
    }

    impl BidTransport for BlockingFirstTransport {
        async fn post_bid(&self, recipient: &Recipient, _body: Bytes) -> Result<BidResponse, RecipientError> {
            if recipient.index() == 0 {
                std::thread::sleep(self.block);
                return Ok(BidResponse {
                    bid: 1.0,
                    ..Default::default()
                });
            }
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_deadline_counts_from_dispatch_start() {
        // On the single-threaded test runtime, recipients 1 and 2 are first
        // polled only after recipient 0 releases the thread at ~150ms. Their
        // deadline has already passed by then.
        let transport = BlockingFirstTransport {
            block: Duration::from_millis(150),
        };
        let dispatcher = Dispatcher::new(transport, Duration::from_millis(100));

        let started = Instant::now();
        let dispatch = dispatcher.dispatch(&request(), &recipients(3)).await.unwrap();
        let elapsed = started.elapsed();

        assert!(elapsed < Duration::from_millis(230), "late tasks got a fresh deadline: {elapsed:?}");
        assert_eq!(dispatch.responses.len(), 1);
        assert_eq!(dispatch.reports.len(), 3);
    }

    #[tokio::test]
    async fn test_thousand_concurrent_replies_are_all_collected_once() {
        let count = 1000;
        let transport = ScriptedTransport {
            delays: vec![Some(Duration::from_millis(1)); count],
        };
        let dispatcher = Dispatcher::new(transport, Duration::from_secs(5));

        let dispatch = dispatcher.dispatch(&request(), &recipients(count)).await.unwrap();

        assert_eq!(dispatch.responses.len(), count);
        let unique: HashSet<i32> = dispatch.responses.iter().map(|r| r.recipient_id).collect();
        assert_eq!(unique.len(), count);
        assert!(dispatch.reports.iter().all(|r| r.outcome == RecipientOutcome::Answered));
    }

    #[tokio::test]
    async fn test_responses_are_in_arrival_order() {
        let transport = ScriptedTransport {
            delays: vec![
                Some(Duration::from_millis(60)),
                Some(Duration::from_millis(5)),
                Some(Duration::from_millis(30)),
            ],
        };
        let dispatcher = Dispatcher::new(transport, Duration::from_millis(500));

        let dispatch = dispatcher.dispatch(&request(), &recipients(3)).await.unwrap();
        let order: Vec<i32> = dispatch.responses.iter().map(|r| r.recipient_id).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }

    #[tokio::test]
    async fn test_failures_are_absorbed() {
        let dispatcher = Dispatcher::new(FailingTransport, Duration::from_millis(100));
        let dispatch = dispatcher.dispatch(&request(), &recipients(4)).await.unwrap();

        assert!(dispatch.responses.is_empty());
        assert_eq!(dispatch.reports.len(), 4);
        assert!(dispatch
            .reports
            .iter()
            .all(|r| r.outcome == RecipientOutcome::Unreachable));
    }

    #[tokio::test]
    async fn test_empty_set_returns_immediately() {
        let dispatcher = Dispatcher::new(FailingTransport, Duration::from_secs(10));
        let started = Instant::now();
        let dispatch = dispatcher.dispatch(&request(), &RecipientSet::default()).await.unwrap();
        assert!(dispatch.responses.is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
