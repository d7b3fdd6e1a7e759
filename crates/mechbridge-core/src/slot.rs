//! [`CallbackSlot`] – single free-function callback per event kind.
//!
//! A slot holds at most one active callback.  Setting a new one replaces the
//! old one.  The first `set` also binds the kind's trampoline with the
//! dispatcher; later `set` calls reuse that binding.  The binding is only
//! dropped by [`CallbackSlot::clear`] (explicit clear or teardown).
//!
//! Slots have no lock of their own: the bridge keeps every slot of a
//! subsystem behind one short-lived mutex and passes in the dispatcher calls
//! as closures, so binding and storing happen atomically with respect to
//! trampolines snapshotting the callback.

use std::fmt;
use std::sync::Arc;

/// A consumer callback for one event kind.  Receives the whole envelope.
pub type Callback<E> = Arc<dyn Fn(&E) + Send + Sync>;

/// Per-kind callback storage with sticky trampoline binding.
pub struct CallbackSlot<E> {
    callback: Option<Callback<E>>,
    bound: bool,
}

impl<E> CallbackSlot<E> {
    /// Create an empty, unbound slot.
    pub fn new() -> Self {
        Self {
            callback: None,
            bound: false,
        }
    }

    /// Store `callback`, replacing any previous one.  Runs `bind` only when
    /// the trampoline is not bound yet.
    ///
    /// Returns `true` when this call performed the binding.
    pub fn set(&mut self, callback: Callback<E>, bind: impl FnOnce()) -> bool {
        self.callback = Some(callback);
        if self.bound {
            return false;
        }
        bind();
        self.bound = true;
        true
    }

    /// Drop the stored callback and run `unbind` if the trampoline is bound.
    ///
    /// Returns `true` when this call performed the unbinding.
    pub fn clear(&mut self, unbind: impl FnOnce()) -> bool {
        self.callback = None;
        if !self.bound {
            return false;
        }
        unbind();
        self.bound = false;
        true
    }

    /// Clone of the current callback, if any.
    pub fn callback(&self) -> Option<Callback<E>> {
        self.callback.clone()
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    pub fn is_set(&self) -> bool {
        self.callback.is_some()
    }
}

impl<E> Default for CallbackSlot<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for CallbackSlot<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackSlot")
            .field("set", &self.callback.is_some())
            .field("bound", &self.bound)
            .finish()
    }
}
