//! Auction subsystem.
//!
//! # Data Flow
//! ```text
//! POST /proxy body
//!     → normalize.rs (decode union record, pick identity & price)
//!     → recipients::Dispatcher (fan out, per-call deadline)
//!     → selector.rs (highest bid, first arrival wins ties)
//!     → diagnostics ring (sampled)
//!     → winning BidResponse
//! ```
//!
//! # Design Decisions
//! - One decode target for every schema version; no per-version parse paths
//! - Normalization and selection are pure and shareable across tasks
//! - Per-recipient failures never fail an auction that has at least one bid

pub mod auctioneer;
pub mod normalize;
pub mod selector;
pub mod types;

pub use auctioneer::{AuctionStage, Auctioneer};
pub use types::{ActionType, AuctionError, BidRequest, BidResponse, ExternalRequest};

/// Inbound auction endpoint.
pub const PROXY_ENDPOINT: &str = "/proxy";

/// Recipient bid endpoint.
pub const BID_ENDPOINT: &str = "/bid";
