//! Simulated collaborators: a reference recipient and a traffic generator.
//!
//! Used by the `recipient` and `load-client` binaries and by the
//! integration tests.

pub mod recipient;
pub mod versions;

pub use recipient::{make_bid, recipient_router};
pub use versions::{generate_request, SchemaVersion};
