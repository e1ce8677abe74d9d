//! Response handling.
//!
//! # Responsibilities
//! - Encode the winning bid for the client
//! - Map auction errors to bare HTTP status codes
//!
//! # Design Decisions
//! - Error responses carry no body; details go to the logs
//! - Malformed input is the only client error (400); everything else is 500

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::auction::{AuctionError, BidResponse};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

impl AuctionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuctionError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            AuctionError::NoRecipients | AuctionError::NoBidsAvailable | AuctionError::Encoding(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuctionError {
    fn into_response(self) -> Response {
        self.status_code().into_response()
    }
}

/// Serialize the winning bid into a `200 OK` JSON response.
pub fn winner_response(winner: &BidResponse) -> Result<Response, AuctionError> {
    let body = serde_json::to_vec(winner).map_err(AuctionError::Encoding)?;
    let mut response = Response::new(Body::from(body));
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let malformed = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(AuctionError::MalformedInput(malformed).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AuctionError::NoBidsAvailable.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(AuctionError::NoRecipients.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_winner_response_is_json() {
        let response = winner_response(&BidResponse {
            recipient_id: 1,
            id: "a".into(),
            message: "m".into(),
            bid: 2.0,
        })
        .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], JSON_CONTENT_TYPE);
    }
}
