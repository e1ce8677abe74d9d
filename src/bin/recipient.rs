//! Reference recipient: answers `POST /bid` with a random bid above the floor.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;

use bid_proxy::config::ObservabilityConfig;
use bid_proxy::lifecycle::{signals, Shutdown};
use bid_proxy::observability::logging;
use bid_proxy::sim::recipient_router;

#[derive(Parser)]
#[command(name = "recipient")]
#[command(about = "Reference bidder for the auction proxy", long_about = None)]
struct Cli {
    /// Recipient ID reported in every bid (non-zero).
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(1..))]
    id: i32,

    /// Port to listen on.
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(1..))]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&ObservabilityConfig::default())?;

    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(recipient = cli.id, address = %addr, "Recipient listening");

    let shutdown = Shutdown::new();
    let mut stop = shutdown.subscribe();
    signals::spawn_signal_handler(shutdown);

    axum::serve(listener, recipient_router(cli.id))
        .with_graceful_shutdown(async move {
            let _ = stop.recv().await;
        })
        .await?;
    Ok(())
}
