use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::diagnostics::DiagnosticEntry;
use crate::http::server::AppState;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub recipients: usize,
    pub bid_timeout_ms: u64,
    pub diagnostics_capacity: usize,
    pub diagnostics_recorded: usize,
}

#[derive(Serialize)]
pub struct RecipientStatus {
    pub index: usize,
    pub endpoint: String,
}

#[derive(Serialize)]
pub struct DiagnosticSlot {
    pub slot: usize,
    pub entry: DiagnosticEntry,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let ring = state.auctioneer.diagnostics().ring();
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        recipients: state.auctioneer.recipients().len(),
        bid_timeout_ms: state.config.timeouts.bid_ms,
        diagnostics_capacity: ring.capacity(),
        diagnostics_recorded: ring.recorded(),
    })
}

pub async fn get_recipients(State(state): State<AppState>) -> Json<Vec<RecipientStatus>> {
    let recipients = state
        .auctioneer
        .recipients()
        .iter()
        .map(|r| RecipientStatus {
            index: r.index(),
            endpoint: r.to_string(),
        })
        .collect();
    Json(recipients)
}

/// Slots may be overwritten while this snapshot is being taken.
pub async fn get_diagnostics(State(state): State<AppState>) -> Json<Vec<DiagnosticSlot>> {
    let slots = state
        .auctioneer
        .diagnostics()
        .ring()
        .snapshot()
        .into_iter()
        .map(|(slot, entry)| DiagnosticSlot {
            slot,
            entry: DiagnosticEntry::clone(&entry),
        })
        .collect();
    Json(slots)
}

pub async fn reset_diagnostics(State(state): State<AppState>) -> StatusCode {
    state.auctioneer.diagnostics().ring().reset();
    tracing::info!("Diagnostic ring cursor reset");
    StatusCode::NO_CONTENT
}
