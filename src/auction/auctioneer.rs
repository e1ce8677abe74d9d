//! Auction pipeline.
//!
//! Drives one inbound request through
//! `Received → Normalized → Dispatching → Selecting → Responded`, or into
//! `Failed` from whichever stage hit an error. Requests are independent of
//! each other; nothing here is shared across auctions except the read-only
//! recipient set and the diagnostic ring.

use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::auction::normalize;
use crate::auction::selector::select_winner;
use crate::auction::types::{AuctionError, BidResponse};
use crate::diagnostics::{DiagnosticEntry, Diagnostics};
use crate::observability::metrics;
use crate::recipients::{BidTransport, Dispatcher, HttpTransport, RecipientSet};

/// Where an auction currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuctionStage {
    Received,
    Normalized,
    Dispatching,
    Selecting,
    Responded,
    Failed,
}

/// Runs auctions against a fixed recipient set.
pub struct Auctioneer<T = HttpTransport> {
    recipients: Arc<RecipientSet>,
    dispatcher: Dispatcher<T>,
    diagnostics: Arc<Diagnostics>,
}

impl<T> Auctioneer<T>
where
    T: BidTransport,
{
    pub fn new(recipients: Arc<RecipientSet>, dispatcher: Dispatcher<T>, diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            recipients,
            dispatcher,
            diagnostics,
        }
    }

    pub fn recipients(&self) -> &RecipientSet {
        &self.recipients
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Run a full auction for one inbound body and return the winning bid.
    pub async fn run(&self, request_id: &str, body: &[u8]) -> Result<BidResponse, AuctionError> {
        let start = Instant::now();
        let mut stage = AuctionStage::Received;

        let result = self.drive(request_id, body, start, &mut stage).await;

        match &result {
            Ok(winner) => {
                tracing::info!(
                    request_id = %request_id,
                    winner = winner.recipient_id,
                    bid = winner.bid,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Auction won"
                );
                metrics::record_auction("won", start);
            }
            Err(e) => {
                tracing::warn!(
                    request_id = %request_id,
                    stage = ?stage,
                    error = %e,
                    "Auction failed"
                );
                advance(&mut stage, AuctionStage::Failed, request_id);
                metrics::record_auction(e.kind(), start);
            }
        }

        result
    }

    async fn drive(
        &self,
        request_id: &str,
        body: &[u8],
        start: Instant,
        stage: &mut AuctionStage,
    ) -> Result<BidResponse, AuctionError> {
        let external = normalize::decode(body)?;
        let request = normalize::normalize(&external);
        advance(stage, AuctionStage::Normalized, request_id);

        if self.recipients.is_empty() {
            return Err(AuctionError::NoRecipients);
        }

        advance(stage, AuctionStage::Dispatching, request_id);
        let dispatch = self.dispatcher.dispatch(&request, &self.recipients).await?;
        metrics::record_bids_collected(dispatch.responses.len());

        advance(stage, AuctionStage::Selecting, request_id);
        let winner = select_winner(&dispatch.responses).cloned();

        if self.diagnostics.should_sample() {
            self.diagnostics.record(DiagnosticEntry {
                auction_id: Uuid::new_v4(),
                request_id: request_id.to_string(),
                recorded_at_ms: SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis() as u64,
                external,
                normalized: request,
                winner: winner.as_ref().ok().cloned(),
                collected: dispatch.responses,
                recipients: dispatch.reports,
                elapsed_ms: start.elapsed().as_millis() as u64,
            });
        }

        let winner = winner?;
        advance(stage, AuctionStage::Responded, request_id);
        Ok(winner)
    }
}

fn advance(stage: &mut AuctionStage, next: AuctionStage, request_id: &str) {
    tracing::debug!(request_id = %request_id, from = ?stage, to = ?next, "Auction stage");
    *stage = next;
}
