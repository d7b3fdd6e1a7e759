//! Drive-train events: wheel commands finishing, failing, and changing state.

use mechbridge_core::{EventBridge, event_set};
use mechbridge_types::{DriveErrorType, DriveMotorSide, DriveState, DriveType};

event_set! {
    pub struct Drive as "drive" {
        event: DriveEvent,
        kind: DriveKind,
        listener: DriveEventListener,
        callbacks: DriveCallbacks,
    }
    Complete { id: u16 } => on_complete / on_complete;
    Error { id: u16, side: DriveMotorSide, error: DriveErrorType } => on_error / on_error;
    /// A command of `drive_type` entered `state`.
    StateChange { drive_type: DriveType, state: DriveState } => on_state_change / on_state_change;
}

pub type DriveBridge<D> = EventBridge<Drive, D>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_gate_blocks_every_kind, sim_bridge};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[derive(Default)]
    struct Counter {
        completions: AtomicUsize,
    }

    impl DriveEventListener for Counter {
        fn on_complete(&self, _id: u16) {
            self.completions.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn concurrent_firing_and_registration_churn() {
        const FIRING_THREADS: usize = 4;
        const CHURN_THREADS: usize = 3;
        const EVENTS_PER_THREAD: u16 = 250;

        let (dispatcher, bridge) = sim_bridge::<Drive>();
        let bridge = Arc::new(bridge);
        let anchor = Arc::new(Counter::default());
        bridge.add_listener(anchor.clone(), true).unwrap();

        thread::scope(|scope| {
            for _ in 0..FIRING_THREADS {
                let dispatcher = Arc::clone(&dispatcher);
                scope.spawn(move || {
                    for id in 0..EVENTS_PER_THREAD {
                        dispatcher.fire(&DriveEvent::Complete { id });
                    }
                });
            }
            for _ in 0..CHURN_THREADS {
                let bridge = Arc::clone(&bridge);
                scope.spawn(move || {
                    for round in 0..EVENTS_PER_THREAD {
                        let listener: Arc<dyn DriveEventListener> = Arc::new(Counter::default());
                        bridge.add_listener(Arc::clone(&listener), round % 4 == 0).unwrap();
                        bridge.remove_listener(&listener);
                    }
                });
            }
        });

        // the anchor was registered for the whole run
        assert_eq!(
            anchor.completions.load(Ordering::SeqCst),
            FIRING_THREADS * EVENTS_PER_THREAD as usize
        );
        assert_eq!(bridge.listener_count(), 1);

        bridge.clear_listeners();
        assert_eq!(bridge.listener_count(), 0);
        assert_eq!(bridge.keep_alive_count(), 0);
        assert_eq!(dispatcher.listener_count(), 0);
        assert_eq!(bridge.stats().faults, 0);
    }

    #[test]
    fn state_change_callback_sees_drive_type() {
        let (dispatcher, bridge) = sim_bridge::<Drive>();
        let rotations = Arc::new(AtomicUsize::new(0));
        let r = Arc::clone(&rotations);
        bridge
            .on_state_change(move |drive_type, _| {
                if drive_type == DriveType::Rotate {
                    r.fetch_add(1, Ordering::SeqCst);
                }
            })
            .unwrap();

        for drive_type in [DriveType::Xy, DriveType::Rotate, DriveType::Rotate] {
            dispatcher.fire(&DriveEvent::StateChange {
                drive_type,
                state: DriveState::Completed,
            });
        }
        assert_eq!(rotations.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn closed_gate_blocks_every_drive_kind() {
        assert_gate_blocks_every_kind::<Drive>(
            &[
                DriveEvent::Complete { id: 3 },
                DriveEvent::Error {
                    id: 3,
                    side: DriveMotorSide::Both,
                    error: DriveErrorType::Force,
                },
                DriveEvent::StateChange {
                    drive_type: DriveType::Distance,
                    state: DriveState::Running,
                },
            ],
            Arc::new(Counter::default()),
        );
    }
}
