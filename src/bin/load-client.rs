//! Load client: fires random multi-version requests at the proxy.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use clap::Parser;
use futures_util::stream::{self, StreamExt};

use bid_proxy::auction::PROXY_ENDPOINT;
use bid_proxy::config::ObservabilityConfig;
use bid_proxy::observability::logging;
use bid_proxy::sim::{generate_request, SchemaVersion};

#[derive(Parser)]
#[command(name = "load-client")]
#[command(about = "Generates auction traffic for the proxy", long_about = None)]
struct Cli {
    /// Proxy port.
    #[arg(short, long, default_value_t = 8050)]
    port: u16,

    /// Total number of requests to send.
    #[arg(short, long, default_value_t = 1_000_000)]
    limit: usize,

    /// Requests in flight at once.
    #[arg(short, long, default_value_t = 256)]
    concurrency: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(&ObservabilityConfig::default())?;

    let url = format!("http://localhost:{}{}", cli.port, PROXY_ENDPOINT);
    let client = reqwest::Client::new();
    let succeeded = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);
    let start = Instant::now();

    tracing::info!(url = %url, limit = cli.limit, concurrency = cli.concurrency, "Starting client session");

    stream::iter(0..cli.limit)
        .for_each_concurrent(cli.concurrency.max(1), |_| {
            let client = &client;
            let url = &url;
            let succeeded = &succeeded;
            let failed = &failed;
            async move {
                let body = match generate_request(SchemaVersion::random()) {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to encode request");
                        failed.fetch_add(1, Ordering::Relaxed);
                        return;
                    }
                };
                let request_text = String::from_utf8_lossy(&body).into_owned();

                match client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, "application/json")
                    .body(body)
                    .send()
                    .await
                {
                    Ok(res) => {
                        let status = res.status();
                        let text = res.text().await.unwrap_or_default();
                        if status.is_success() {
                            succeeded.fetch_add(1, Ordering::Relaxed);
                        } else {
                            failed.fetch_add(1, Ordering::Relaxed);
                        }
                        tracing::info!(req = %request_text, status = %status, resp = %text, "Auction finished");
                    }
                    Err(e) => {
                        failed.fetch_add(1, Ordering::Relaxed);
                        tracing::warn!(req = %request_text, error = %e, "Request failed");
                    }
                }
            }
        })
        .await;

    let elapsed = start.elapsed();
    tracing::info!(
        succeeded = succeeded.load(Ordering::Relaxed),
        failed = failed.load(Ordering::Relaxed),
        elapsed_ms = elapsed.as_millis() as u64,
        rps = %format!("{:.2}", cli.limit as f64 / elapsed.as_secs_f64()),
        "Client session finished"
    );
    Ok(())
}
