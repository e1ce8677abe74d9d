//! Shared utilities for integration and load testing.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum::{http::StatusCode, routing::post, Json, Router};
use tokio::net::TcpListener;

use bid_proxy::auction::{BidRequest, BidResponse, BID_ENDPOINT};
use bid_proxy::config::ProxyConfig;
use bid_proxy::http::HttpServer;
use bid_proxy::lifecycle::Shutdown;

/// Serve `router` on an ephemeral local port.
pub async fn serve(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    addr
}

/// Start a recipient whose reply is computed by `f` from the bid request.
#[allow(dead_code)]
pub async fn start_programmable_recipient<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(BidRequest) -> Fut + Clone + Send + Sync + 'static,
    Fut: Future<Output = (StatusCode, String)> + Send + 'static,
{
    let router = Router::new().route(
        BID_ENDPOINT,
        post(move |Json(request): Json<BidRequest>| {
            let f = f.clone();
            async move { f(request).await }
        }),
    );
    serve(router).await
}

/// Start a recipient that bids `min_price + premium` after `delay`.
#[allow(dead_code)]
pub async fn start_bidder(recipient_id: i32, premium: f64, delay: Duration) -> SocketAddr {
    start_programmable_recipient(move |request: BidRequest| async move {
        tokio::time::sleep(delay).await;
        let response = BidResponse {
            recipient_id,
            id: request.id,
            message: format!("from {recipient_id}"),
            bid: request.min_price + premium,
        };
        (StatusCode::OK, serde_json::to_string(&response).unwrap())
    })
    .await
}

/// Start a recipient that accepts requests and never answers.
#[allow(dead_code)]
pub async fn start_silent_recipient() -> SocketAddr {
    start_programmable_recipient(|_| async {
        std::future::pending::<()>().await;
        (StatusCode::OK, String::new())
    })
    .await
}

/// Proxy configuration pointing at `recipients`.
#[allow(dead_code)]
pub fn proxy_config(recipients: &[SocketAddr], bid_ms: u64) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".into();
    config.recipients.list = recipients
        .iter()
        .map(|addr| addr.to_string())
        .collect::<Vec<_>>()
        .join(",");
    config.timeouts.bid_ms = bid_ms;
    config.timeouts.request_ms = bid_ms * 10;
    config
}

/// Start the proxy on an ephemeral port; triggering the returned handle stops it.
#[allow(dead_code)]
pub async fn start_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(config).unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });
    (addr, shutdown)
}

/// Client that opens a fresh connection per request.
#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
