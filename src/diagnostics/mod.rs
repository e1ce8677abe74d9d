//! Diagnostics subsystem.
//!
//! # Data Flow
//! ```text
//! Auction finished
//!     → sampling decision (diagnostics.sample_rate)
//!     → entry.rs (request, normalized request, replies, winner)
//!     → ring.rs (lock-free slot claim, overwrite oldest)
//!
//! Admin API
//!     → snapshot / reset
//! ```
//!
//! # Design Decisions
//! - Sits on the hot path of every auction, so writes never take a lock
//! - Best effort only; nothing reads it for correctness

pub mod entry;
pub mod ring;

use std::num::NonZeroUsize;

use crate::config::schema::DiagnosticsConfig;
use crate::observability::metrics;

pub use entry::DiagnosticEntry;
pub use ring::DiagnosticRing;

const FALLBACK_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1024) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Sampled recorder of recent auctions.
pub struct Diagnostics {
    ring: DiagnosticRing<DiagnosticEntry>,
    sample_rate: f64,
}

impl Diagnostics {
    pub fn new(config: &DiagnosticsConfig) -> Self {
        let capacity = NonZeroUsize::new(config.capacity).unwrap_or(FALLBACK_CAPACITY);
        Self {
            ring: DiagnosticRing::new(capacity),
            sample_rate: config.sample_rate.clamp(0.0, 1.0),
        }
    }

    /// Decide whether the current auction should be recorded.
    pub fn should_sample(&self) -> bool {
        if self.sample_rate >= 1.0 {
            return true;
        }
        self.sample_rate > 0.0 && fastrand::f64() < self.sample_rate
    }

    pub fn record(&self, entry: DiagnosticEntry) -> usize {
        metrics::record_diagnostic();
        self.ring.record(entry)
    }

    pub fn ring(&self) -> &DiagnosticRing<DiagnosticEntry> {
        &self.ring
    }
}
