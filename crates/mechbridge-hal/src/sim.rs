//! Simulated native control for running subsystems without hardware.
//!
//! [`SimControl`] answers `init`/`dispose` the way the native SDK does,
//! with an integer status code, and can be told to fail so error paths are
//! testable.  [`sim_subsystem`] wires it to a
//! [`SimDispatcher`][mechbridge_core::SimDispatcher] and a fresh bridge.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};

use mechbridge_core::{
    EventBridge, EventSet, HostContext, SimDispatcher, Subsystem, SubsystemControl, check_status,
};
use mechbridge_types::BridgeError;
use tracing::debug;

/// Status code the SDK returns when a subsystem is used before `init`.
pub const STATUS_NOT_ACTIVE: i32 = -1;

/// In-process native control.  Always succeeds unless told otherwise.
#[derive(Debug)]
pub struct SimControl {
    subsystem: &'static str,
    active: AtomicBool,
    init_status: AtomicI32,
    dispose_status: AtomicI32,
}

impl SimControl {
    pub fn new(subsystem: &'static str) -> Self {
        Self {
            subsystem,
            active: AtomicBool::new(false),
            init_status: AtomicI32::new(0),
            dispose_status: AtomicI32::new(0),
        }
    }

    /// Make the next `init` calls return `code`.  `0` restores success.
    pub fn fail_init_with(&self, code: i32) {
        self.init_status.store(code, Ordering::Relaxed);
    }

    /// Make the next `dispose` calls return `code`.  `0` restores success.
    pub fn fail_dispose_with(&self, code: i32) {
        self.dispose_status.store(code, Ordering::Relaxed);
    }
}

impl SubsystemControl for SimControl {
    fn init(&self) -> Result<(), BridgeError> {
        check_status(self.subsystem, self.init_status.load(Ordering::Relaxed), "init")?;
        self.active.store(true, Ordering::Release);
        debug!(subsystem = self.subsystem, "sim control initialised");
        Ok(())
    }

    fn dispose(&self) -> Result<(), BridgeError> {
        if !self.is_active() {
            return check_status(self.subsystem, STATUS_NOT_ACTIVE, "dispose");
        }
        check_status(
            self.subsystem,
            self.dispose_status.load(Ordering::Relaxed),
            "dispose",
        )?;
        self.active.store(false, Ordering::Release);
        debug!(subsystem = self.subsystem, "sim control disposed");
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// A subsystem running entirely in-process.
pub type SimSubsystem<S> = Subsystem<S, SimDispatcher<S>, SimControl>;

/// Build a simulated subsystem for event set `S` delivering through
/// `context`.  The dispatcher is returned separately so callers can raise
/// events.
pub fn sim_subsystem<S: EventSet>(context: HostContext) -> (Arc<SimDispatcher<S>>, SimSubsystem<S>) {
    let dispatcher = Arc::new(SimDispatcher::new());
    let bridge = EventBridge::new(Arc::clone(&dispatcher), context);
    (dispatcher, Subsystem::new(bridge, SimControl::new(S::NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::{Sound, SoundCallbacks, SoundEvent};
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn dispose_before_init_reports_not_active() {
        let control = SimControl::new("sound");
        let err = control.dispose().unwrap_err();
        assert!(matches!(
            err,
            BridgeError::Control {
                code: STATUS_NOT_ACTIVE,
                ..
            }
        ));
    }

    #[test]
    fn init_failure_leaves_control_inactive() {
        let control = SimControl::new("sound");
        control.fail_init_with(-3);
        assert!(control.init().is_err());
        assert!(!control.is_active());

        control.fail_init_with(0);
        control.init().unwrap();
        assert!(control.is_active());
    }

    #[test]
    fn sim_subsystem_runs_full_lifecycle() {
        let (dispatcher, sound) = sim_subsystem::<Sound>(HostContext::exclusive());
        let begun = Arc::new(AtomicUsize::new(0));
        let b = Arc::clone(&begun);

        sound.init().unwrap();
        assert!(sound.is_active());
        sound
            .bridge()
            .on_begin(move |_, _| {
                b.fetch_add(1, Ordering::SeqCst);
            })
            .unwrap();
        dispatcher.fire(&SoundEvent::Begin { id: 1, volume: 0.8 });

        sound.dispose().unwrap();
        assert!(!sound.is_active());
        dispatcher.fire(&SoundEvent::Begin { id: 2, volume: 0.8 });

        assert_eq!(begun.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failed_native_dispose_still_closes_bridge() {
        let (dispatcher, sound) = sim_subsystem::<Sound>(HostContext::exclusive());
        sound.init().unwrap();
        sound.bridge().on_complete(|_| {}).unwrap();
        sound.control().fail_dispose_with(-2);

        assert!(sound.dispose().is_err());
        assert!(!sound.bridge().is_open());
        assert_eq!(dispatcher.fire(&SoundEvent::Complete { id: 3 }), 0);
    }
}
