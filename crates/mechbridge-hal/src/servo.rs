//! Auxiliary servo events, reported per channel.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::ServoId;

event_set! {
    pub struct Servo as "servo" {
        event: ServoEvent,
        kind: ServoKind,
        listener: ServoEventListener,
        callbacks: ServoCallbacks,
    }
    Complete { id: u16, channel: ServoId } => on_complete / on_complete;
    Abort { id: u16, channel: ServoId } => on_abort / on_abort;
    Error { id: u16, channel: ServoId } => on_error / on_error;
}

pub type ServoBridge<D> = EventBridge<Servo, D>;
