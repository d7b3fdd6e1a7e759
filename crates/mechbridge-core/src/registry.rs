//! Listener bookkeeping for one bridge.
//!
//! [`ListenerRegistry`] keeps delivery order (priority entries first) and
//! owns a [`KeepAliveTable`] of strong references.  The dispatcher only ever
//! receives weak targets, so a listener lives exactly as long as it is
//! registered here or owned elsewhere by the consumer.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::event::ListenerId;

/// One registered listener: its identity, its priority, and the liveness
/// flag shared with the dispatcher-side [`NativeHandle`][crate::NativeHandle].
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    id: ListenerId,
    priority: bool,
    live: Arc<AtomicBool>,
}

impl ListenerHandle {
    /// A live registration for the listener identified by `id`.
    pub fn new(id: ListenerId, priority: bool) -> Self {
        Self {
            id,
            priority,
            live: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Identity of the registered listener.
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// `true` if the listener was added ahead of ordinary listeners.
    pub fn is_priority(&self) -> bool {
        self.priority
    }

    /// `false` once the registration was removed or cleared.
    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Flag shared with the dispatcher-side target.
    pub(crate) fn live_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.live)
    }

    fn retire(&self) {
        self.live.store(false, Ordering::Release);
    }
}

/// Strong references to every registered listener, keyed by identity.
pub struct KeepAliveTable<L: ?Sized> {
    entries: HashMap<ListenerId, Arc<L>>,
}

impl<L: ?Sized> KeepAliveTable<L> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, listener: Arc<L>) -> ListenerId {
        let id = ListenerId::of(&listener);
        self.entries.insert(id, listener);
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> Option<Arc<L>> {
        self.entries.remove(&id)
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L: ?Sized> Default for KeepAliveTable<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for KeepAliveTable<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// Ordered listener handles plus their keep-alive references.
pub struct ListenerRegistry<L: ?Sized> {
    order: Vec<ListenerHandle>,
    keep_alive: KeepAliveTable<L>,
}

impl<L: ?Sized> ListenerRegistry<L> {
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            keep_alive: KeepAliveTable::new(),
        }
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.keep_alive.contains(id)
    }

    /// Record `listener` under `handle`.  Priority handles are placed after
    /// the last priority handle, ordinary ones at the end.
    ///
    /// Returns `false` and changes nothing if the listener is already here.
    pub fn insert(&mut self, handle: ListenerHandle, listener: Arc<L>) -> bool {
        if self.contains(handle.id) {
            return false;
        }
        if handle.priority {
            let at = self
                .order
                .iter()
                .position(|h| !h.priority)
                .unwrap_or(self.order.len());
            self.order.insert(at, handle);
        } else {
            self.order.push(handle);
        }
        self.keep_alive.insert(listener);
        true
    }

    /// Retire and remove one listener.  The strong reference is handed back
    /// so the caller decides when the listener may be dropped.
    pub fn remove(&mut self, id: ListenerId) -> Option<(ListenerHandle, Arc<L>)> {
        let at = self.order.iter().position(|h| h.id == id)?;
        let handle = self.order.remove(at);
        handle.retire();
        let listener = self.keep_alive.remove(id)?;
        Some((handle, listener))
    }

    /// Retire and remove every listener, in delivery order.
    pub fn drain(&mut self) -> Vec<(ListenerHandle, Arc<L>)> {
        let mut drained = Vec::with_capacity(self.order.len());
        for handle in self.order.drain(..) {
            handle.retire();
            if let Some(listener) = self.keep_alive.remove(handle.id) {
                drained.push((handle, listener));
            }
        }
        drained
    }

    /// Listener ids in delivery order.
    pub fn ids(&self) -> Vec<ListenerId> {
        self.order.iter().map(ListenerHandle::id).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn keep_alive(&self) -> &KeepAliveTable<L> {
        &self.keep_alive
    }
}

impl<L: ?Sized> Default for ListenerRegistry<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: ?Sized> fmt::Debug for ListenerRegistry<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("order", &self.order)
            .field("keep_alive", &self.keep_alive)
            .finish()
    }
}
