//! Request normalization.
//!
//! Every external schema version decodes into [`ExternalRequest`]; this module
//! collapses it into the single [`BidRequest`] shape recipients understand.
//!
//! Field priority is fixed:
//! - identity: `id`, then `key`, then `name`
//! - price: `balance`, then `price`, then `bid`
//!
//! A family with no populated field yields its zero value.

use crate::auction::types::{AuctionError, BidRequest, ExternalRequest};

/// Decode an inbound body into the union request record.
pub fn decode(body: &[u8]) -> Result<ExternalRequest, AuctionError> {
    serde_json::from_slice(body).map_err(AuctionError::MalformedInput)
}

/// Collapse a decoded external request into the internal shape.
pub fn normalize(request: &ExternalRequest) -> BidRequest {
    let id = request
        .id
        .clone()
        .or_else(|| request.key.map(|key| key.to_string()))
        .or_else(|| request.name.clone())
        .unwrap_or_default();

    let min_price = request
        .balance
        .or(request.price)
        .or(request.bid)
        .unwrap_or_default();

    BidRequest {
        action_type: request.action_type.unwrap_or_default(),
        id,
        min_price,
        comment: request.note.clone().unwrap_or_default(),
    }
}
