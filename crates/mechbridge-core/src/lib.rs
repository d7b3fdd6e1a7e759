//! `mechbridge-core` – Generic Event Bridge
//!
//! Routes events raised by a native hardware dispatcher on arbitrary threads
//! into consumer listeners and callbacks, one subsystem at a time, without
//! ever letting a late event reach torn-down consumer state.
//!
//! # Modules
//!
//! - [`event`] – [`EventSet`]: the per-subsystem description (envelope,
//!   kind, listener trait), plus [`ListenerId`] and [`Trampoline`].
//! - [`dispatcher`] – [`Dispatcher`]: the seam to the native event source.
//! - [`bridge`] – [`EventBridge`]: registration, per-kind callbacks, gated
//!   delivery and teardown.
//! - [`gate`] – [`BridgeGate`]: the teardown switch checked by every
//!   delivery.
//! - [`context`] – [`HostContext`]: the exclusive, re-entrant host execution
//!   context, inline or channel-backed.
//! - [`registry`] / [`slot`] – listener and callback bookkeeping.
//! - [`handle`] – [`NativeHandle`]: the non-owning listener target handed to
//!   dispatchers.
//! - [`lifecycle`] – [`Subsystem`] and [`SubsystemControl`]: init/dispose
//!   ordering around a bridge.
//! - [`sim`] – [`SimDispatcher`]: an in-process dispatcher for tests and
//!   workstation runs.
//! - [`event_set!`] – generates a subsystem's types and typed `on_…`
//!   callback setters.

pub mod bridge;
pub mod context;
pub mod dispatcher;
pub mod event;
pub mod gate;
pub mod handle;
pub mod lifecycle;
mod macros;
pub mod registry;
pub mod sim;
pub mod slot;
pub mod stats;

#[cfg(test)]
mod test_support;

use std::any::Any;

pub use bridge::EventBridge;
pub use context::{DEFAULT_EXECUTOR_NAME, DeliveryMode, HostContext, HostGuard};
pub use dispatcher::Dispatcher;
pub use event::{EventSet, ListenerId, Trampoline};
pub use gate::{BridgeGate, Ticket};
pub use handle::NativeHandle;
pub use lifecycle::{Subsystem, SubsystemControl, check_status};
pub use mechbridge_types::BridgeError;
pub use registry::{KeepAliveTable, ListenerHandle, ListenerRegistry};
pub use sim::{SimDispatcher, SimWorker};
pub use slot::{Callback, CallbackSlot};
pub use stats::DeliveryStats;

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
