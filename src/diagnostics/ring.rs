//! Lock-free overwrite-oldest ring buffer.
//!
//! Writers claim a slot with a single `fetch_add` on a monotonic counter
//! (taken modulo capacity) and swap their entry into it. Writers never block
//! and never wait for readers. A fast writer may lap a slow one and overwrite
//! the slot it is about to fill; readers may see a slot replaced right after
//! reading it. Both are acceptable for best-effort diagnostics.
//!
//! The slot array never grows, but each write boxes its entry in a fresh
//! `Arc` so readers can hold an entry while the slot is overwritten. The
//! write path is lock-free, not allocation-free.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;

/// Fixed-capacity circular store.
pub struct DiagnosticRing<T> {
    slots: Box<[ArcSwapOption<T>]>,
    cursor: AtomicUsize,
}

impl<T> DiagnosticRing<T> {
    /// Pre-allocate `capacity` empty slots.
    pub fn new(capacity: NonZeroUsize) -> Self {
        let slots = (0..capacity.get()).map(|_| ArcSwapOption::empty()).collect();
        Self {
            slots,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Claim the next slot index.
    pub fn claim(&self) -> usize {
        self.cursor.fetch_add(1, Ordering::Relaxed) % self.slots.len()
    }

    /// Store `entry` in the next slot, replacing whatever was there.
    /// Returns the slot index written.
    pub fn record(&self, entry: T) -> usize {
        let slot = self.claim();
        self.slots[slot].store(Some(Arc::new(entry)));
        slot
    }

    /// Restart the wrap cycle. Slot contents are left as they are.
    pub fn reset(&self) {
        self.cursor.store(0, Ordering::Relaxed);
    }

    /// Number of slot claims since startup or the last reset.
    pub fn recorded(&self) -> usize {
        self.cursor.load(Ordering::Relaxed)
    }

    /// Current content of one slot.
    pub fn get(&self, slot: usize) -> Option<Arc<T>> {
        self.slots.get(slot)?.load_full()
    }

    /// All occupied slots, in slot order.
    pub fn snapshot(&self) -> Vec<(usize, Arc<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, cell)| cell.load_full().map(|entry| (slot, entry)))
            .collect()
    }
}
