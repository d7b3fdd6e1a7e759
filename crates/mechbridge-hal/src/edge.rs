//! Edge (cliff) detection events from the downward IR sensors.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{GapDirection, IrSensor};

event_set! {
    pub struct Edge as "edge" {
        event: EdgeEvent,
        kind: EdgeKind,
        listener: EdgeEventListener,
        callbacks: EdgeCallbacks,
    }
    /// Raw state of every sensor after any of them changed.
    Change { sensors: Vec<IrSensor> } => on_change / on_change;
    GapDetect { direction: GapDirection } => on_gap_detect / on_gap_detect;
}

pub type EdgeBridge<D> = EventBridge<Edge, D>;
