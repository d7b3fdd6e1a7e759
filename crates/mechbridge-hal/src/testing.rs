//! Helpers shared by the subsystem test modules.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use mechbridge_core::{Callback, EventBridge, EventSet, HostContext, SimDispatcher};

pub type SimBridge<S> = EventBridge<S, SimDispatcher<S>>;

pub fn sim_bridge<S: EventSet>() -> (Arc<SimDispatcher<S>>, SimBridge<S>) {
    let dispatcher = Arc::new(SimDispatcher::new());
    let bridge = EventBridge::new(Arc::clone(&dispatcher), HostContext::exclusive());
    (dispatcher, bridge)
}

/// Bind a counting callback for every kind of `S`, register `listener`,
/// close the gate and push `samples` through every target the dispatcher
/// holds.  Nothing may be delivered.
///
/// `samples` must cover every kind of `S`.
pub fn assert_gate_blocks_every_kind<S: EventSet>(samples: &[S::Event], listener: Arc<S::Listener>) {
    let covered: HashSet<S::Kind> = samples.iter().map(S::kind_of).collect();
    assert_eq!(covered.len(), S::kinds().len(), "samples must cover every {} kind", S::NAME);

    let (dispatcher, bridge) = sim_bridge::<S>();
    let hits = Arc::new(AtomicUsize::new(0));
    for &kind in S::kinds() {
        let h = Arc::clone(&hits);
        let callback: Callback<S::Event> = Arc::new(move |_: &S::Event| {
            h.fetch_add(1, Ordering::SeqCst);
        });
        bridge.set_callback(kind, Some(callback)).unwrap();
    }
    bridge.add_listener(listener, false).unwrap();

    let handles = dispatcher.handles();
    let trampolines: Vec<_> = S::kinds()
        .iter()
        .filter_map(|&kind| bridge.trampoline(kind).cloned())
        .collect();

    bridge.gate().close();
    for event in samples {
        dispatcher.fire(event);
        for trampoline in &trampolines {
            trampoline.call(event);
        }
        for handle in &handles {
            handle.deliver(event);
        }
    }

    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert_eq!(bridge.stats().delivered, 0);
    assert!(bridge.stats().suppressed > 0);
}
