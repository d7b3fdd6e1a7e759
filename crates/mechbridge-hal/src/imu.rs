//! Inertial measurement events.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{GestureDirection, ImuData, ImuGesture};

event_set! {
    pub struct Imu as "imu" {
        event: ImuEvent,
        kind: ImuKind,
        listener: ImuEventListener,
        callbacks: ImuCallbacks,
    }
    Update { data: ImuData } => on_update / on_update;
    /// A motion gesture, and the direction it came from.
    Gesture { gesture: ImuGesture, from: GestureDirection } => on_gesture / on_gesture;
}

pub type ImuBridge<D> = EventBridge<Imu, D>;
