//! Reference recipient: bids a random amount at or above the reserve price.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use rand::Rng;

use crate::auction::{BidRequest, BidResponse, BID_ENDPOINT};
use crate::sim::versions::random_string;

/// Router answering `POST /bid` as recipient `id`.
pub fn recipient_router(id: i32) -> Router {
    Router::new().route(BID_ENDPOINT, post(bid_handler)).with_state(id)
}

/// Bid `min_price + U[0, 1)` for the request.
pub fn make_bid(recipient_id: i32, request: &BidRequest) -> BidResponse {
    BidResponse {
        recipient_id,
        id: request.id.clone(),
        message: random_string(100),
        bid: request.min_price + rand::thread_rng().gen_range(0.0..1.0),
    }
}

async fn bid_handler(State(id): State<i32>, body: Bytes) -> Response {
    let request: BidRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(recipient = id, error = %e, "Rejected bid request");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let response = make_bid(id, &request);
    tracing::debug!(recipient = id, auction = %request.id, bid = response.bid, "Bid placed");
    Json(response).into_response()
}
