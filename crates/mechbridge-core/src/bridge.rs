//! [`EventBridge`] – the generic listener/callback bridge for one subsystem.
//!
//! The bridge owns every strong listener reference and every callback.  The
//! dispatcher only receives [`NativeHandle`]s and per-kind [`Trampoline`]s,
//! both of which route through the bridge's gate and host context before any
//! consumer code runs.
//!
//! Lock order: a registration holds the registry (or slot) lock while it
//! calls into the dispatcher, so dispatcher methods must not wait for
//! deliveries (see [`Dispatcher`]).  Deliveries take the host context first and the
//! slot lock only long enough to clone the callback out.  Neither lock is
//! ever held while waiting for the host context.

use std::collections::HashMap;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use mechbridge_types::BridgeError;
use parking_lot::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::context::HostContext;
use crate::dispatcher::Dispatcher;
use crate::event::{EventSet, ListenerId, Trampoline};
use crate::gate::{BridgeGate, Ticket};
use crate::handle::NativeHandle;
use crate::panic_message;
use crate::registry::{ListenerHandle, ListenerRegistry};
use crate::slot::{Callback, CallbackSlot};
use crate::stats::{DeliveryCounters, DeliveryStats};

/// State reachable from dispatcher threads.
pub(crate) struct Shared<S: EventSet> {
    pub(crate) gate: BridgeGate,
    pub(crate) context: HostContext,
    pub(crate) slots: Mutex<HashMap<S::Kind, CallbackSlot<S::Event>>>,
    pub(crate) registry: Mutex<ListenerRegistry<S::Listener>>,
    pub(crate) counters: DeliveryCounters,
}

impl<S: EventSet> Shared<S> {
    /// First check, before the host context is requested.
    pub(crate) fn admit(&self, kind: S::Kind) -> Option<Ticket> {
        let ticket = self.gate.ticket();
        if ticket.is_none() {
            self.suppress(kind, "gate closed");
        }
        ticket
    }

    /// Second check, inside the host context.
    pub(crate) fn still_admits(&self, kind: S::Kind, ticket: Ticket) -> bool {
        if self.gate.admits(ticket) {
            return true;
        }
        self.suppress(kind, "gate closed since the event was raised");
        false
    }

    pub(crate) fn suppress(&self, kind: S::Kind, reason: &'static str) {
        self.counters.record_suppressed();
        trace!(subsystem = S::NAME, kind = ?kind, reason, "delivery suppressed");
    }

    /// Run consumer code, containing any panic.
    pub(crate) fn invoke(&self, kind: S::Kind, call: impl FnOnce()) {
        match catch_unwind(AssertUnwindSafe(call)) {
            Ok(()) => self.counters.record_delivered(),
            Err(payload) => {
                self.counters.record_fault();
                error!(
                    subsystem = S::NAME,
                    kind = ?kind,
                    panic = %panic_message(payload.as_ref()),
                    "consumer panicked during delivery; event dropped"
                );
            }
        }
    }

    fn fire_callback(this: &Arc<Self>, kind: S::Kind, event: &S::Event) {
        let Some(ticket) = this.admit(kind) else {
            return;
        };
        let shared = Arc::clone(this);
        let event = event.clone();
        this.context.execute(move || {
            if !shared.still_admits(kind, ticket) {
                return;
            }
            let callback = shared
                .slots
                .lock()
                .get(&kind)
                .and_then(CallbackSlot::callback);
            match callback {
                Some(callback) => shared.invoke(kind, || callback(&event)),
                None => shared.suppress(kind, "no callback set"),
            }
        });
    }
}

struct Teardown {
    was_open: bool,
    unbound: usize,
    released: usize,
}

/// Bridge between one dispatcher `D` and the consumers of event set `S`.
pub struct EventBridge<S: EventSet, D: Dispatcher<S>> {
    shared: Arc<Shared<S>>,
    dispatcher: Arc<D>,
    trampolines: HashMap<S::Kind, Trampoline<S::Event>>,
}

impl<S: EventSet, D: Dispatcher<S>> EventBridge<S, D> {
    /// Create an open bridge delivering through `context`.
    ///
    /// One trampoline per kind is created up front; it is only handed to the
    /// dispatcher once a callback for that kind is set.
    pub fn new(dispatcher: Arc<D>, context: HostContext) -> Self {
        let slots = S::kinds()
            .iter()
            .map(|&kind| (kind, CallbackSlot::new()))
            .collect();
        let shared = Arc::new(Shared {
            gate: BridgeGate::new(),
            context,
            slots: Mutex::new(slots),
            registry: Mutex::new(ListenerRegistry::new()),
            counters: DeliveryCounters::default(),
        });
        let trampolines = S::kinds()
            .iter()
            .map(|&kind| {
                let shared = Arc::clone(&shared);
                let trampoline = Trampoline::new(move |event: &S::Event| {
                    Shared::fire_callback(&shared, kind, event);
                });
                (kind, trampoline)
            })
            .collect();
        debug!(subsystem = S::NAME, mode = %shared.context.mode(), "bridge created");
        Self {
            shared,
            dispatcher,
            trampolines,
        }
    }

    /// Create a bridge on the process-wide host context.
    pub fn with_global_context(dispatcher: Arc<D>) -> Self {
        Self::new(dispatcher, HostContext::global())
    }

    /// Register `listener`.
    ///
    /// Returns `Ok(false)` if the same listener is already registered and
    /// `Err(BridgeError::Closed)` after teardown until the next `init`.
    pub fn add_listener(
        &self,
        listener: Arc<S::Listener>,
        priority: bool,
    ) -> Result<bool, BridgeError> {
        let id = ListenerId::of(&listener);
        let mut registry = self.shared.registry.lock();
        if !self.shared.gate.is_open() {
            return Err(BridgeError::closed(S::NAME));
        }
        if registry.contains(id) {
            debug!(subsystem = S::NAME, listener = %id, "listener already registered");
            return Ok(false);
        }
        let registration = ListenerHandle::new(id, priority);
        let handle = NativeHandle::new(&listener, &registration, Arc::clone(&self.shared));
        self.dispatcher.add_listener(handle, priority);
        registry.insert(registration, listener);
        debug!(subsystem = S::NAME, listener = %id, priority, "listener registered");
        Ok(true)
    }

    /// Unregister `listener`.  Returns `false` if it was not registered.
    ///
    /// No new delivery to the listener begins after this returns; one that
    /// already passed its checks may still finish.
    pub fn remove_listener(&self, listener: &Arc<S::Listener>) -> bool {
        let id = ListenerId::of(listener);
        let mut registry = self.shared.registry.lock();
        let Some((_, strong)) = registry.remove(id) else {
            return false;
        };
        self.dispatcher.remove_listener(id);
        drop(registry);
        drop(strong);
        debug!(subsystem = S::NAME, listener = %id, "listener removed");
        true
    }

    /// Replace the callback for `kind`, or clear it with `None`.
    ///
    /// Subsystem crates expose this as typed `on_…` methods through the
    /// callbacks trait generated by [`event_set!`][crate::event_set].
    pub fn set_callback(
        &self,
        kind: S::Kind,
        callback: Option<Callback<S::Event>>,
    ) -> Result<(), BridgeError> {
        let Some(trampoline) = self.trampolines.get(&kind) else {
            warn!(subsystem = S::NAME, kind = ?kind, "kind not listed by the event set; ignored");
            return Ok(());
        };
        let mut slots = self.shared.slots.lock();
        let slot = slots.entry(kind).or_default();
        let Some(callback) = callback else {
            if slot.clear(|| self.dispatcher.remove_callback(kind, trampoline)) {
                debug!(subsystem = S::NAME, kind = ?kind, "callback cleared and unbound");
            }
            return Ok(());
        };
        if !self.shared.gate.is_open() {
            return Err(BridgeError::closed(S::NAME));
        }
        let bound = slot.set(callback, || {
            self.dispatcher.add_callback(kind, trampoline.clone());
        });
        debug!(subsystem = S::NAME, kind = ?kind, bound, "callback set");
        Ok(())
    }

    /// Tear down every listener and callback and close the gate.
    ///
    /// Pending deliveries become no-ops.  Registration fails with
    /// [`BridgeError::Closed`] until [`EventBridge::reopen`].
    pub fn clear_listeners(&self) {
        let Teardown {
            was_open,
            unbound,
            released,
        } = self.teardown();
        info!(subsystem = S::NAME, was_open, unbound, released, "listeners cleared");
    }

    fn teardown(&self) -> Teardown {
        let was_open = self.shared.gate.close();

        let mut unbound = 0;
        {
            let mut slots = self.shared.slots.lock();
            for (kind, slot) in slots.iter_mut() {
                let trampoline = self.trampolines.get(kind);
                let unbind = || {
                    if let Some(trampoline) = trampoline {
                        self.dispatcher.remove_callback(*kind, trampoline);
                    }
                };
                if slot.clear(unbind) {
                    unbound += 1;
                }
            }
        }

        let drained = self.shared.registry.lock().drain();
        for (handle, _) in &drained {
            self.dispatcher.remove_listener(handle.id());
        }
        let released = drained.len();
        drop(drained);

        Teardown {
            was_open,
            unbound,
            released,
        }
    }

    /// Reopen the gate after a teardown.  Called by subsystem `init`.
    pub fn reopen(&self) {
        self.shared.gate.open();
        info!(subsystem = S::NAME, "bridge reopened");
    }

    /// `false` between teardown and the next [`EventBridge::reopen`].
    pub fn is_open(&self) -> bool {
        self.shared.gate.is_open()
    }

    /// The gate shared with every handle and trampoline of this bridge.
    pub fn gate(&self) -> &BridgeGate {
        &self.shared.gate
    }

    pub fn context(&self) -> &HostContext {
        &self.shared.context
    }

    /// The native dispatcher this bridge registers with.
    pub fn dispatcher(&self) -> &Arc<D> {
        &self.dispatcher
    }

    pub fn listener_count(&self) -> usize {
        self.shared.registry.lock().len()
    }

    /// Strong listener references currently held by the bridge.
    pub fn keep_alive_count(&self) -> usize {
        self.shared.registry.lock().keep_alive().len()
    }

    pub fn contains_listener(&self, listener: &Arc<S::Listener>) -> bool {
        self.shared.registry.lock().contains(ListenerId::of(listener))
    }

    /// Registered listener ids in delivery order.
    pub fn listener_ids(&self) -> Vec<ListenerId> {
        self.shared.registry.lock().ids()
    }

    /// `true` while the trampoline for `kind` is registered with the
    /// dispatcher.
    pub fn is_bound(&self, kind: S::Kind) -> bool {
        self.shared
            .slots
            .lock()
            .get(&kind)
            .is_some_and(CallbackSlot::is_bound)
    }

    pub fn has_callback(&self, kind: S::Kind) -> bool {
        self.shared
            .slots
            .lock()
            .get(&kind)
            .is_some_and(CallbackSlot::is_set)
    }

    /// The trampoline for `kind`, bound or not.
    pub fn trampoline(&self, kind: S::Kind) -> Option<&Trampoline<S::Event>> {
        self.trampolines.get(&kind)
    }

    /// Snapshot of the delivery counters.
    pub fn stats(&self) -> DeliveryStats {
        self.shared.counters.snapshot()
    }
}

impl<S: EventSet, D: Dispatcher<S>> Drop for EventBridge<S, D> {
    fn drop(&mut self) {
        let Teardown {
            unbound, released, ..
        } = self.teardown();
        if unbound > 0 || released > 0 {
            debug!(subsystem = S::NAME, unbound, released, "bridge dropped");
        }
    }
}

impl<S: EventSet, D: Dispatcher<S>> fmt::Debug for EventBridge<S, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBridge")
            .field("subsystem", &S::NAME)
            .field("open", &self.is_open())
            .field("listeners", &self.listener_count())
            .field("context", &self.shared.context)
            .finish()
    }
}
