//! Real-time auction proxy.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────────┐
//!                         │                  AUCTION PROXY                   │
//!                         │                                                  │
//!   POST /proxy           │  ┌──────────┐   ┌───────────┐   ┌────────────┐   │
//!   ──────────────────────┼─▶│   http   │──▶│ normalize │──▶│ dispatcher │───┼──▶ recipient 1
//!                         │  │  server  │   │ (schemas) │   │ (fan-out,  │───┼──▶ recipient 2
//!                         │  └──────────┘   └───────────┘   │ deadlines) │───┼──▶ recipient N
//!                         │       ▲                         └─────┬──────┘   │
//!   winning bid           │       │         ┌───────────┐         │          │
//!   ◀─────────────────────┼───────┴─────────│ selector  │◀────────┘          │
//!                         │                 └─────┬─────┘                    │
//!                         │                       ▼                          │
//!                         │               ┌───────────────┐                  │
//!                         │               │ diagnostics   │◀── /admin        │
//!                         │               │ ring buffer   │                  │
//!                         │               └───────────────┘                  │
//!                         └──────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use bid_proxy::config::loader::{ensure_valid, load_config};
use bid_proxy::config::ProxyConfig;
use bid_proxy::lifecycle::{signals, Shutdown};
use bid_proxy::observability::{logging, metrics};
use bid_proxy::HttpServer;

#[derive(Parser)]
#[command(name = "bid-proxy")]
#[command(about = "Fans auction requests out to recipients and returns the highest bid", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides listener.bind_address).
    #[arg(short, long)]
    port: Option<u16>,

    /// Comma-separated recipient list, e.g. 8051,8052,8053.
    #[arg(short, long)]
    recipients: Option<String>,

    /// Per-recipient deadline in milliseconds.
    #[arg(short = 't', long)]
    bid_timeout_ms: Option<u64>,
}

impl Cli {
    fn apply(&self, config: &mut ProxyConfig) {
        if let Some(port) = self.port {
            config.listener.bind_address = format!("0.0.0.0:{port}");
        }
        if let Some(recipients) = &self.recipients {
            config.recipients.list = recipients.clone();
        }
        if let Some(bid_ms) = self.bid_timeout_ms {
            config.timeouts.bid_ms = bid_ms;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ProxyConfig::default(),
    };
    cli.apply(&mut config);
    ensure_valid(&config)?;

    logging::init_logging(&config.observability)?;
    tracing::info!("bid-proxy v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        recipients = %config.recipients.list,
        bid_timeout_ms = config.timeouts.bid_ms,
        diagnostics_capacity = config.diagnostics.capacity,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
