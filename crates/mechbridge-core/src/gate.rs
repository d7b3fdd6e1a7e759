//! [`BridgeGate`] – the teardown switch in front of every trampoline.
//!
//! A gate is shared by one bridge, its trampolines and every
//! [`NativeHandle`][crate::handle::NativeHandle] it hands to the dispatcher.
//! Closing it turns all pending and future deliveries into no-ops without
//! touching any lock, so teardown can start while dispatcher threads are
//! still raising events.
//!
//! The gate is checked twice per delivery: once before the host execution
//! context is requested, and once more after it has been acquired.  A
//! delivery that was waiting for the context while the gate closed therefore
//! never reaches consumer code.
//!
//! Every close starts a new generation.  The first check hands out a
//! [`Ticket`] and the second one only passes while the gate is still open in
//! that same generation, so a delivery queued before a close stays dead even
//! if the gate is reopened before it runs.
//!
//! # Example
//!
//! ```
//! use mechbridge_core::BridgeGate;
//!
//! let gate = BridgeGate::new();
//! assert!(gate.is_open());
//!
//! assert!(gate.close()); // was open
//! assert!(!gate.close()); // already closed
//!
//! gate.open();
//! assert!(gate.is_open());
//!
//! let ticket = gate.ticket().unwrap();
//! gate.close();
//! gate.open();
//! assert!(!gate.admits(ticket)); // issued before the close
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Proof that the gate was open in a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Shared open/closed flag.  Clones observe the same state.
#[derive(Debug, Clone)]
pub struct BridgeGate {
    open: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl BridgeGate {
    /// Create an open gate.
    pub fn new() -> Self {
        Self {
            open: Arc::new(AtomicBool::new(true)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// `true` while deliveries are allowed.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Number of closes so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// A ticket for the current generation, or `None` while closed.
    pub fn ticket(&self) -> Option<Ticket> {
        // generation first: a close that lands in between is seen as closed
        let generation = self.generation();
        self.is_open().then_some(Ticket(generation))
    }

    /// `true` while open and not closed since `ticket` was issued.
    pub fn admits(&self, ticket: Ticket) -> bool {
        self.is_open() && self.generation() == ticket.0
    }

    /// Close the gate.  Returns `true` if this call performed the transition.
    ///
    /// Every outstanding [`Ticket`] is invalidated, including ones issued
    /// while the gate was already closed and reopened.
    pub fn close(&self) -> bool {
        let was_open = self.open.swap(false, Ordering::AcqRel);
        self.generation.fetch_add(1, Ordering::AcqRel);
        was_open
    }

    /// Reopen the gate.  Only subsystem (re)initialisation should call this.
    pub fn open(&self) {
        self.open.store(true, Ordering::Release);
    }
}

impl Default for BridgeGate {
    fn default() -> Self {
        Self::new()
    }
}
