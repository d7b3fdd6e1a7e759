//! Time-of-flight proximity events from the left and right sensors.
//!
//! Both kinds report the two sensors together so consumers can compare
//! them without buffering.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{TofData, TofGesture};

event_set! {
    pub struct Tof as "tof" {
        event: TofEvent,
        kind: TofKind,
        listener: TofEventListener,
        callbacks: TofCallbacks,
    }
    ProximityGesture { left: TofGesture, right: TofGesture } => on_proximity_gesture / on_proximity_gesture;
    /// A configured distance threshold was crossed.
    ProximityThreshold { left: TofData, right: TofData } => on_proximity_threshold / on_proximity_threshold;
}

pub type TofBridge<D> = EventBridge<Tof, D>;
