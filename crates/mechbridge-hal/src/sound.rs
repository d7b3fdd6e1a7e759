//! Sound playback events.

use mechbridge_core::{EventBridge, event_set};

event_set! {
    pub struct Sound as "sound" {
        event: SoundEvent,
        kind: SoundKind,
        listener: SoundEventListener,
        callbacks: SoundCallbacks,
    }
    /// Playback of clip `id` started at `volume` (0.0 to 1.0).
    Begin { id: u16, volume: f32 } => on_begin / on_begin;
    Complete { id: u16 } => on_complete / on_complete;
    Abort { id: u16 } => on_abort / on_abort;
    Error { id: u16 } => on_error / on_error;
}

pub type SoundBridge<D> = EventBridge<Sound, D>;
