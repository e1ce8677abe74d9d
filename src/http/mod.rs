//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → POST /proxy → auction::Auctioneer
//!     → response.rs (encode winner, map errors to status codes)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer, X_REQUEST_ID};
