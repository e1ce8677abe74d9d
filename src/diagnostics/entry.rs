//! Recorded auction transaction.

use serde::Serialize;
use uuid::Uuid;

use crate::auction::types::{BidRequest, BidResponse, ExternalRequest};
use crate::recipients::RecipientReport;

/// One auction as seen by the proxy.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEntry {
    pub auction_id: Uuid,
    pub request_id: String,
    /// Unix time in milliseconds.
    pub recorded_at_ms: u64,
    pub external: ExternalRequest,
    pub normalized: BidRequest,
    pub collected: Vec<BidResponse>,
    pub winner: Option<BidResponse>,
    pub recipients: Vec<RecipientReport>,
    pub elapsed_ms: u64,
}
