//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the auction and admin handlers
//! - Wire up middleware (request ID, tracing, timeout, body limit)
//! - Build the process-wide proxy state exactly once
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::auction::{Auctioneer, PROXY_ENDPOINT};
use crate::config::ProxyConfig;
use crate::diagnostics::Diagnostics;
use crate::http::response::winner_response;
use crate::recipients::{Dispatcher, HttpTransport, RecipientSet, RecipientSetError};

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub auctioneer: Arc<Auctioneer>,
    pub config: Arc<ProxyConfig>,
}

/// HTTP server for the auction proxy.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, RecipientSetError> {
        let recipients = Arc::new(RecipientSet::from_config(&config.recipients)?);
        let transport = HttpTransport::new(&config.timeouts);
        let dispatcher = Dispatcher::new(transport, Duration::from_millis(config.timeouts.bid_ms));
        let diagnostics = Arc::new(Diagnostics::new(&config.diagnostics));

        let state = AppState {
            auctioneer: Arc::new(Auctioneer::new(recipients, dispatcher, diagnostics)),
            config: Arc::new(config),
        };

        let router = Self::build_router(&state.config, state.clone());
        Ok(Self { router, state })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        let mut router = Router::new().route(PROXY_ENDPOINT, post(proxy_handler));
        if config.admin.enabled {
            router = router.merge(admin::setup_admin_router(state.clone()));
        }

        router.with_state(state).layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
                .layer(TimeoutLayer::new(Duration::from_millis(config.timeouts.request_ms))),
        )
    }

    /// Router with all layers applied, for driving the server in-process.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            recipients = self.state.auctioneer.recipients().len(),
            bid_timeout_ms = self.state.config.timeouts.bid_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `POST /proxy`: run one auction and return the winning bid.
async fn proxy_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    let winner = match state.auctioneer.run(request_id, &body).await {
        Ok(winner) => winner,
        Err(e) => return e.into_response(),
    };

    match winner_response(&winner) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Failed to encode winning bid");
            e.into_response()
        }
    }
}
