//! The seam between a bridge and the native event source.
//!
//! On the robot this is the vendor SDK's per-subsystem dispatcher; in tests
//! and on a workstation it is [`SimDispatcher`][crate::sim::SimDispatcher].
//! The bridge only ever hands over two kinds of targets:
//!
//! * a [`NativeHandle`] per registered listener, and
//! * one [`Trampoline`] per event kind that has a callback bound.
//!
//! Dispatchers may call either from any thread, at any time, including after
//! the bridge asked for removal.  Both targets stay safe to call.
//!
//! # Locking
//!
//! The bridge calls [`Dispatcher::add_listener`] and
//! [`Dispatcher::remove_listener`] while holding its registry lock, and the
//! callback methods while holding its slot lock.  Implementations must
//! therefore never wait for an in-flight delivery inside these methods, and
//! must not hold their own lock while calling a target: a target may block
//! on the host context, whose holder may be registering a listener.
//! [`SimDispatcher::fire`][crate::sim::SimDispatcher::fire] snapshots its
//! targets and releases the lock first.
//!
//! A listener target may be delivered to from inside `add_listener` itself.
//! A trampoline must not be called on the registering thread from inside
//! `add_callback`, since the slot lock is still held there.

use crate::event::{EventSet, ListenerId, Trampoline};
use crate::handle::NativeHandle;

/// Native event source for event set `S`.
///
/// Every method must return without waiting for deliveries in progress.
pub trait Dispatcher<S: EventSet>: Send + Sync + 'static {
    /// Register a listener target.  Priority targets run before ordinary
    /// ones; among themselves they keep registration order.
    fn add_listener(&self, handle: NativeHandle<S>, priority: bool);

    /// Drop the target whose [`NativeHandle::id`] is `id`.  Unknown ids are
    /// ignored.  A delivery already running on another thread may finish.
    fn remove_listener(&self, id: ListenerId);

    /// Bind the trampoline for `kind`.
    fn add_callback(&self, kind: S::Kind, trampoline: Trampoline<S::Event>);

    /// Unbind a trampoline previously passed to [`Dispatcher::add_callback`].
    /// Match it with [`Trampoline::same_as`].
    fn remove_callback(&self, kind: S::Kind, trampoline: &Trampoline<S::Event>);
}
