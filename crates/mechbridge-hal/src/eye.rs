//! Eye display animation events.

use mechbridge_core::{EventBridge, event_set};

event_set! {
    pub struct Eye as "eye" {
        event: EyeEvent,
        kind: EyeKind,
        listener: EyeEventListener,
        callbacks: EyeCallbacks,
    }
    Start { id: u16 } => on_start / on_start;
    Complete { id: u16 } => on_complete / on_complete;
    Abort { id: u16 } => on_abort / on_abort;
}

pub type EyeBridge<D> = EventBridge<Eye, D>;
