//! Auction wire types and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kind of user action the auction is run for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ActionType {
    #[default]
    Session,
    Hit,
    Access,
    AdView,
}

/// Returned when an `action_type` integer has no matching variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown action type {0}")]
pub struct UnknownActionType(pub i64);

impl TryFrom<i64> for ActionType {
    type Error = UnknownActionType;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ActionType::Session),
            1 => Ok(ActionType::Hit),
            2 => Ok(ActionType::Access),
            3 => Ok(ActionType::AdView),
            other => Err(UnknownActionType(other)),
        }
    }
}

impl From<ActionType> for i64 {
    fn from(action: ActionType) -> Self {
        match action {
            ActionType::Session => 0,
            ActionType::Hit => 1,
            ActionType::Access => 2,
            ActionType::AdView => 3,
        }
    }
}

/// Inbound request as it arrives on `/proxy`.
///
/// Carries the fields of every supported schema version at once; a given
/// caller populates only the subset its version knows about. This is the only
/// shape inbound bodies are decoded into.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_type: Option<ActionType>,

    /// Identity, versions 1 and 4.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Price, versions 1 (number) and 4 (quoted number).
    #[serde(
        default,
        deserialize_with = "lenient_price::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub balance: Option<f64>,

    /// Identity, version 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<i32>,

    /// Price, version 2.
    #[serde(
        default,
        deserialize_with = "lenient_price::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<f64>,

    /// Free text, version 2.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// Identity, version 3.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Price, version 3.
    #[serde(
        default,
        deserialize_with = "lenient_price::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub bid: Option<f64>,
}

/// Normalized request sent to every recipient on `/bid`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidRequest {
    pub action_type: ActionType,
    pub id: String,
    /// Reserve price. Communicated to recipients, never enforced here.
    pub min_price: f64,
    pub comment: String,
}

/// A recipient's answer to a [`BidRequest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidResponse {
    #[serde(rename = "recip_id")]
    pub recipient_id: i32,
    pub id: String,
    pub message: String,
    pub bid: f64,
}

/// Request-level failures. Only these ever reach the caller of `/proxy`.
#[derive(Debug, Error)]
pub enum AuctionError {
    /// Inbound body is not a valid request record.
    #[error("malformed input: {0}")]
    MalformedInput(#[source] serde_json::Error),

    /// The proxy was started without any recipients.
    #[error("no recipients configured")]
    NoRecipients,

    /// Nobody answered before their deadline.
    #[error("no bids available")]
    NoBidsAvailable,

    /// Failed to serialize an outbound request or the winning response.
    #[error("encoding failure: {0}")]
    Encoding(#[source] serde_json::Error),
}

impl AuctionError {
    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuctionError::MalformedInput(_) => "malformed_input",
            AuctionError::NoRecipients => "no_recipients",
            AuctionError::NoBidsAvailable => "no_bids",
            AuctionError::Encoding(_) => "encoding",
        }
    }
}

/// Price fields arrive either as JSON numbers or as strings holding a number.
mod lenient_price {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawPrice {
        Number(f64),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<RawPrice>::deserialize(deserializer)? {
            None => Ok(None),
            Some(RawPrice::Number(value)) => Ok(Some(value)),
            // Empty string means "not set".
            Some(RawPrice::Text(text)) if text.is_empty() => Ok(None),
            Some(RawPrice::Text(text)) => match text.parse::<f64>() {
                // `f64::from_str` accepts "NaN" and "inf"; JSON cannot carry them.
                Ok(value) if value.is_finite() => Ok(Some(value)),
                Ok(_) => Err(D::Error::custom(format!("price {text:?} is not a finite number"))),
                Err(e) => Err(D::Error::custom(format!("invalid price {text:?}: {e}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_type_wire_values() {
        assert_eq!(serde_json::to_string(&ActionType::AdView).unwrap(), "3");
        let action: ActionType = serde_json::from_str("1").unwrap();
        assert_eq!(action, ActionType::Hit);
        assert!(serde_json::from_str::<ActionType>("7").is_err());
    }

    #[test]
    fn test_bid_response_uses_recip_id() {
        let response = BidResponse {
            recipient_id: 4,
            id: "abc".into(),
            message: "hello".into(),
            bid: 1.5,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["recip_id"], 4);
        assert!(json.get("recipient_id").is_none());
    }

    #[test]
    fn test_bid_response_tolerates_missing_fields() {
        // Recipients may omit zero values.
        let response: BidResponse = serde_json::from_str(r#"{"recip_id":2,"id":"x"}"#).unwrap();
        assert_eq!(response.recipient_id, 2);
        assert_eq!(response.bid, 0.0);
        assert!(response.message.is_empty());
    }

    #[test]
    fn test_bid_request_wire_shape() {
        let request = BidRequest {
            action_type: ActionType::Access,
            id: "u1".into(),
            min_price: 0.25,
            comment: "n".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["action_type"], 2);
        assert_eq!(json["id"], "u1");
        assert_eq!(json["min_price"], 0.25);
        assert_eq!(json["comment"], "n");
    }
}
