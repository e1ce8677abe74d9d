//! Winner selection.
//!
//! First-price rule: the highest bid wins. Only a strictly greater bid
//! displaces the current leader, so among equal bids the response that
//! arrived first keeps the lead.

use crate::auction::types::{AuctionError, BidResponse};

/// Pick the highest bid among the collected responses.
pub fn select_winner(responses: &[BidResponse]) -> Result<&BidResponse, AuctionError> {
    let mut highest: Option<&BidResponse> = None;

    for candidate in responses {
        let leads = highest.map_or(true, |current| candidate.bid > current.bid);
        if leads {
            highest = Some(candidate);
        }
    }

    highest.ok_or(AuctionError::NoBidsAvailable)
}
