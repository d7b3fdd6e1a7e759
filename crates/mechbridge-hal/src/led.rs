//! LED animation events.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{LedErrorType, LedSide};

event_set! {
    pub struct Led as "led" {
        event: LedEvent,
        kind: LedKind,
        listener: LedEventListener,
        callbacks: LedCallbacks,
    }
    Complete { id: u16, side: LedSide } => on_complete / on_complete;
    Error { id: u16, side: LedSide, error: LedErrorType } => on_error / on_error;
}

pub type LedBridge<D> = EventBridge<Led, D>;
