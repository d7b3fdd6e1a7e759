//! [`NativeHandle`] – the per-listener target given to the dispatcher.
//!
//! A handle never owns its listener.  It carries a weak reference, the
//! liveness flag of the registry entry, and the bridge state it delivers
//! through.  Every delivery re-checks the gate and the flag after entering
//! the host context, so a handle that outlives its registration is inert.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::debug;

use crate::bridge::Shared;
use crate::event::{EventSet, ListenerId};
use crate::registry::ListenerHandle;

/// Dispatcher-side target for one registered listener.  Cheap to clone.
pub struct NativeHandle<S: EventSet> {
    id: ListenerId,
    target: Weak<S::Listener>,
    live: Arc<AtomicBool>,
    shared: Arc<Shared<S>>,
}

impl<S: EventSet> NativeHandle<S> {
    pub(crate) fn new(
        listener: &Arc<S::Listener>,
        registration: &ListenerHandle,
        shared: Arc<Shared<S>>,
    ) -> Self {
        Self {
            id: registration.id(),
            target: Arc::downgrade(listener),
            live: registration.live_flag(),
            shared,
        }
    }

    /// Identity of the listener this handle targets.  Dispatchers use it to
    /// honour [`Dispatcher::remove_listener`][crate::Dispatcher::remove_listener].
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// `false` once the listener was removed or cleared.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Deliver `event` to the listener on the host context.
    ///
    /// Never panics and never blocks on consumer code from a dispatcher
    /// thread in channel mode.  Gate closure, removal and release all turn
    /// the call into a counted no-op.
    pub fn deliver(&self, event: &S::Event) {
        let kind = S::kind_of(event);
        let Some(ticket) = self.shared.admit(kind) else {
            return;
        };
        if !self.still_live(kind) {
            return;
        }
        let handle = self.clone();
        let event = event.clone();
        self.shared.context.execute(move || {
            if !handle.shared.still_admits(kind, ticket) || !handle.still_live(kind) {
                return;
            }
            let Some(listener) = handle.target.upgrade() else {
                handle.shared.counters.record_stale();
                debug!(
                    subsystem = S::NAME,
                    kind = ?kind,
                    listener = %handle.id,
                    "listener already released; delivery skipped"
                );
                return;
            };
            handle
                .shared
                .invoke(kind, || S::deliver(&listener, &event));
        });
    }

    fn still_live(&self, kind: S::Kind) -> bool {
        if self.is_live() {
            return true;
        }
        self.shared.suppress(kind, "listener removed");
        false
    }
}

impl<S: EventSet> Clone for NativeHandle<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            target: Weak::clone(&self.target),
            live: Arc::clone(&self.live),
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: EventSet> fmt::Debug for NativeHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeHandle")
            .field("subsystem", &S::NAME)
            .field("id", &self.id)
            .field("live", &self.is_live())
            .finish()
    }
}
