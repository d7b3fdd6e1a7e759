//! Capacitive touch events on the head and body.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{TouchActivity, TouchSide, TouchState};

event_set! {
    pub struct Touch as "touch" {
        event: TouchEvent,
        kind: TouchKind,
        listener: TouchEventListener,
        callbacks: TouchCallbacks,
    }
    Touch { side: TouchSide, state: TouchState } => on_touch / on_touch;
    /// A recognised pattern such as patting.
    Activity { side: TouchSide, activity: TouchActivity } => on_activity / on_activity;
}

pub type TouchBridge<D> = EventBridge<Touch, D>;
