//! Recipient subsystem.
//!
//! # Data Flow
//! ```text
//! config string "8051,8052,bidder:9000"
//!     → set.rs (parse once, immutable RecipientSet)
//!
//! Normalized BidRequest
//!     → dispatcher.rs (serialize once, one task per recipient)
//!     → transport.rs (POST /bid, per-call deadline)
//!     → replies collected in arrival order
//! ```
//!
//! # Design Decisions
//! - Recipient set is read-only after startup; shared without locks
//! - Each call has its own deadline; a slow recipient never delays others
//! - Failed calls are dropped, never retried

pub mod dispatcher;
pub mod set;
pub mod transport;

pub use dispatcher::{Dispatch, Dispatcher, RecipientOutcome, RecipientReport};
pub use set::{Recipient, RecipientSet, RecipientSetError};
pub use transport::{BidTransport, HttpTransport, RecipientError};
