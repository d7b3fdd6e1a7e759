//! Per-bridge delivery counters.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Snapshot of what happened to events that reached a bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryStats {
    /// Consumer code ran to completion.
    pub delivered: u64,
    /// Dropped at the gate, or aimed at a listener that was already removed.
    pub suppressed: u64,
    /// Consumer code panicked and the panic was contained.
    pub faults: u64,
    /// The listener had already been released when its delivery ran.
    pub stale: u64,
}

#[derive(Debug, Default)]
pub(crate) struct DeliveryCounters {
    delivered: AtomicU64,
    suppressed: AtomicU64,
    faults: AtomicU64,
    stale: AtomicU64,
}

impl DeliveryCounters {
    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fault(&self) {
        self.faults.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_stale(&self) {
        self.stale.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> DeliveryStats {
        DeliveryStats {
            delivered: self.delivered.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            faults: self.faults.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
        }
    }
}
