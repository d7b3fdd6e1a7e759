//! Event-set abstraction shared by the generic bridge and every subsystem.
//!
//! A subsystem is described once by an [`EventSet`]: its envelope type, a
//! `Copy` discriminant per event kind, and the listener trait consumers
//! implement.  Everything else in this crate is generic over it.  The
//! [`event_set!`][crate::event_set] macro generates the whole description
//! from a compact table.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Description of one hardware subsystem's events.
pub trait EventSet: Send + Sync + 'static {
    /// Immutable argument tuple of one event (the envelope).
    type Event: Clone + fmt::Debug + Send + Sync + 'static;
    /// Discriminant of [`EventSet::Event`].
    type Kind: Copy + Eq + Hash + fmt::Debug + Send + Sync + 'static;
    /// Listener trait object type, e.g. `dyn ArmEventListener`.
    type Listener: ?Sized + Send + Sync + 'static;

    /// Short subsystem name used in logs and errors.
    const NAME: &'static str;

    /// Every kind of this set.  Each gets a callback slot and a trampoline.
    fn kinds() -> &'static [Self::Kind];

    /// Discriminant of `event`.
    fn kind_of(event: &Self::Event) -> Self::Kind;

    /// Call the listener method matching `event`.
    fn deliver(listener: &Self::Listener, event: &Self::Event);
}

/// Identity of a registered listener: the address of its allocation.
///
/// Two `Arc`s pointing at the same listener map to the same id.  The id is
/// only meaningful while the bridge keeps the listener alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(usize);

impl ListenerId {
    /// Identity of the listener behind `listener`.
    pub fn of<L: ?Sized>(listener: &Arc<L>) -> Self {
        Self(Arc::as_ptr(listener).cast::<()>() as usize)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// The fixed-signature entry point bound to the dispatcher for one kind.
///
/// Trampolines compare by identity so a dispatcher can unregister exactly
/// the function it was given, like a function pointer.
pub struct Trampoline<E> {
    entry: Arc<dyn Fn(&E) + Send + Sync>,
}

impl<E> Trampoline<E> {
    /// Wrap `entry`.  Each call creates a new identity.
    pub fn new<F>(entry: F) -> Self
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        Self {
            entry: Arc::new(entry),
        }
    }

    /// Forward one event into the bridge.
    pub fn call(&self, event: &E) {
        (self.entry)(event);
    }

    /// `true` if both are clones of the same trampoline.
    pub fn same_as(&self, other: &Trampoline<E>) -> bool {
        Arc::ptr_eq(&self.entry, &other.entry)
    }
}

impl<E> Clone for Trampoline<E> {
    fn clone(&self) -> Self {
        Self {
            entry: Arc::clone(&self.entry),
        }
    }
}

impl<E> fmt::Debug for Trampoline<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Trampoline({:p})", Arc::as_ptr(&self.entry).cast::<()>())
    }
}
