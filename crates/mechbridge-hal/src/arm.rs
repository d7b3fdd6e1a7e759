//! Arm motion events.
//!
//! The arm controller reports completion and failure of numbered move
//! commands, state transitions per side, and continuous joint movement while
//! a side is being moved by hand.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{ArmErrorType, ArmSide, ArmState};

event_set! {
    /// Event set of the two arms.
    pub struct Arm as "arm" {
        event: ArmEvent,
        kind: ArmKind,
        listener: ArmEventListener,
        callbacks: ArmCallbacks,
    }
    /// Move command `id` finished.
    Complete { id: u16, side: ArmSide } => on_complete / on_complete;
    Error { id: u16, side: ArmSide, error: ArmErrorType } => on_error / on_error;
    StateChange { side: ArmSide, state: ArmState } => on_state_change / on_state_change;
    /// Joint angle changed by `degree_change` since the last report.
    Movement { side: ArmSide, degree_change: f32 } => on_movement / on_movement;
}

pub type ArmBridge<D> = EventBridge<Arm, D>;
