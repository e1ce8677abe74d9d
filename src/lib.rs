//! Real-time auction proxy library.

pub mod admin;
pub mod auction;
pub mod config;
pub mod diagnostics;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod recipients;
pub mod sim;

pub use auction::Auctioneer;
pub use config::schema::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
