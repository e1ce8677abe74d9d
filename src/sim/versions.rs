//! Version-specific request shapes, used only to generate traffic.
//!
//! The proxy never decodes these; it decodes every version into
//! [`ExternalRequest`](crate::auction::ExternalRequest).

use serde::Serialize;

use crate::auction::ActionType;

/// External request schema versions seen in the wild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    V1,
    V2,
    V3,
    /// Like V1, but with the balance quoted.
    V4,
}

impl SchemaVersion {
    pub const ALL: [SchemaVersion; 4] = [
        SchemaVersion::V1,
        SchemaVersion::V2,
        SchemaVersion::V3,
        SchemaVersion::V4,
    ];

    pub fn random() -> Self {
        Self::ALL[fastrand::usize(..Self::ALL.len())]
    }
}

#[derive(Debug, Serialize)]
pub struct RequestV1 {
    pub action_type: ActionType,
    pub id: String,
    pub balance: f64,
}

#[derive(Debug, Serialize)]
pub struct RequestV2 {
    pub action_type: ActionType,
    pub key: i32,
    pub price: f32,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct RequestV3 {
    pub action_type: ActionType,
    pub name: String,
    pub bid: u64,
}

#[derive(Debug, Serialize)]
pub struct RequestV4 {
    pub action_type: ActionType,
    pub id: String,
    pub balance: String,
}

pub fn random_action_type() -> ActionType {
    match fastrand::u8(..4) {
        0 => ActionType::Session,
        1 => ActionType::Hit,
        2 => ActionType::Access,
        _ => ActionType::AdView,
    }
}

/// Random ASCII alphanumeric string.
pub fn random_string(len: usize) -> String {
    std::iter::repeat_with(fastrand::alphanumeric).take(len).collect()
}

/// Encode a random request of the given schema version.
pub fn generate_request(version: SchemaVersion) -> Result<Vec<u8>, serde_json::Error> {
    match version {
        SchemaVersion::V1 => serde_json::to_vec(&RequestV1 {
            action_type: random_action_type(),
            id: random_string(20),
            balance: fastrand::f64(),
        }),
        SchemaVersion::V2 => serde_json::to_vec(&RequestV2 {
            action_type: random_action_type(),
            key: fastrand::i32(0..9999),
            price: fastrand::f32(),
            note: random_string(50),
        }),
        SchemaVersion::V3 => serde_json::to_vec(&RequestV3 {
            action_type: random_action_type(),
            name: random_string(30),
            bid: fastrand::u64(..10_000),
        }),
        SchemaVersion::V4 => serde_json::to_vec(&RequestV4 {
            action_type: random_action_type(),
            id: random_string(20),
            balance: fastrand::f64().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::normalize::{decode, normalize};

    #[test]
    fn test_every_version_normalizes_with_identity() {
        for version in SchemaVersion::ALL {
            let body = generate_request(version).unwrap();
            let request = normalize(&decode(&body).unwrap());
            assert!(!request.id.is_empty(), "{version:?} lost its identity");
            assert!(request.min_price >= 0.0);
        }
    }

    #[test]
    fn test_v4_quotes_balance() {
        let body = generate_request(SchemaVersion::V4).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["balance"].is_string());
    }

    #[test]
    fn test_random_string_length() {
        let s = random_string(100);
        assert_eq!(s.len(), 100);
        assert!(s.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
