//! [`SimDispatcher`] – an in-process stand-in for a native dispatcher.
//!
//! Keeps listener targets and bound trampolines the way the robot's SDK
//! does and raises events synchronously on the calling thread, or on a
//! dedicated worker thread via [`SimDispatcher::spawn_worker`].  Used by the
//! test suites and for running consumer code on a workstation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use mechbridge_types::BridgeError;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::dispatcher::Dispatcher;
use crate::event::{EventSet, ListenerId, Trampoline};
use crate::handle::NativeHandle;

struct SimState<S: EventSet> {
    listeners: Vec<(NativeHandle<S>, bool)>,
    callbacks: HashMap<S::Kind, Vec<Trampoline<S::Event>>>,
}

pub struct SimDispatcher<S: EventSet> {
    state: Mutex<SimState<S>>,
}

impl<S: EventSet> SimDispatcher<S> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SimState {
                listeners: Vec::new(),
                callbacks: HashMap::new(),
            }),
        }
    }

    /// Raise `event` on the calling thread.
    ///
    /// Targets are snapshotted first and invoked without the dispatcher lock
    /// held, bound callbacks before listeners.  Returns how many targets
    /// were called.
    pub fn fire(&self, event: &S::Event) -> usize {
        let kind = S::kind_of(event);
        let (callbacks, listeners) = {
            let state = self.state.lock();
            let callbacks = state.callbacks.get(&kind).cloned().unwrap_or_default();
            let listeners: Vec<_> = state.listeners.iter().map(|(h, _)| h.clone()).collect();
            (callbacks, listeners)
        };
        trace!(
            subsystem = S::NAME,
            kind = ?kind,
            callbacks = callbacks.len(),
            listeners = listeners.len(),
            "sim dispatch"
        );
        for trampoline in &callbacks {
            trampoline.call(event);
        }
        for handle in &listeners {
            handle.deliver(event);
        }
        callbacks.len() + listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.state.lock().listeners.len()
    }

    /// Listener targets in dispatch order.
    pub fn handles(&self) -> Vec<NativeHandle<S>> {
        self.state
            .lock()
            .listeners
            .iter()
            .map(|(h, _)| h.clone())
            .collect()
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.state.lock().listeners.iter().any(|(h, _)| h.id() == id)
    }

    pub fn callback_count(&self, kind: S::Kind) -> usize {
        self.state.lock().callbacks.get(&kind).map_or(0, Vec::len)
    }

    /// Start a thread that raises every event sent to the returned worker.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Executor`] when the thread cannot be spawned.
    pub fn spawn_worker(self: &Arc<Self>, name: &str) -> Result<SimWorker<S>, BridgeError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<S::Event>();
        let dispatcher = Arc::clone(self);
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                let mut raised = 0;
                while let Some(event) = receiver.blocking_recv() {
                    dispatcher.fire(&event);
                    raised += 1;
                }
                raised
            })
            .map_err(|e| BridgeError::Executor(format!("failed to spawn '{name}': {e}")))?;
        debug!(subsystem = S::NAME, worker = name, "sim worker started");
        Ok(SimWorker {
            sender: Some(sender),
            handle: Some(handle),
        })
    }
}

impl<S: EventSet> Default for SimDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSet> Dispatcher<S> for SimDispatcher<S> {
    fn add_listener(&self, handle: NativeHandle<S>, priority: bool) {
        let mut state = self.state.lock();
        if state.listeners.iter().any(|(h, _)| h.id() == handle.id()) {
            return;
        }
        if priority {
            let at = state
                .listeners
                .iter()
                .position(|(_, p)| !p)
                .unwrap_or(state.listeners.len());
            state.listeners.insert(at, (handle, priority));
        } else {
            state.listeners.push((handle, priority));
        }
    }

    fn remove_listener(&self, id: ListenerId) {
        self.state.lock().listeners.retain(|(h, _)| h.id() != id);
    }

    fn add_callback(&self, kind: S::Kind, trampoline: Trampoline<S::Event>) {
        self.state
            .lock()
            .callbacks
            .entry(kind)
            .or_default()
            .push(trampoline);
    }

    fn remove_callback(&self, kind: S::Kind, trampoline: &Trampoline<S::Event>) {
        let mut state = self.state.lock();
        let emptied = match state.callbacks.get_mut(&kind) {
            Some(bound) => {
                bound.retain(|t| !t.same_as(trampoline));
                bound.is_empty()
            }
            None => false,
        };
        if emptied {
            state.callbacks.remove(&kind);
        }
    }
}

impl<S: EventSet> fmt::Debug for SimDispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SimDispatcher")
            .field("subsystem", &S::NAME)
            .field("listeners", &state.listeners.len())
            .field("callback_kinds", &state.callbacks.len())
            .finish()
    }
}

/// Sending side of a [`SimDispatcher`] worker thread.
pub struct SimWorker<S: EventSet> {
    sender: Option<mpsc::UnboundedSender<S::Event>>,
    handle: Option<JoinHandle<usize>>,
}

impl<S: EventSet> SimWorker<S> {
    /// Queue `event` for the worker.  Returns `false` if the worker is gone.
    pub fn raise(&self, event: S::Event) -> bool {
        self.sender
            .as_ref()
            .is_some_and(|sender| sender.send(event).is_ok())
    }

    /// Stop accepting events, wait for the queue to drain and return how
    /// many events the worker raised.
    pub fn join(mut self) -> usize {
        self.shutdown()
    }

    fn shutdown(&mut self) -> usize {
        self.sender.take();
        self.handle
            .take()
            .and_then(|handle| handle.join().ok())
            .unwrap_or(0)
    }
}

impl<S: EventSet> Drop for SimWorker<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
