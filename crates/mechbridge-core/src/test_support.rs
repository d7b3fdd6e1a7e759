//! A small event set and recording listener shared by the unit tests.

use std::sync::Arc;

use parking_lot::Mutex;

crate::event_set! {
    pub struct Probe as "probe" {
        event: ProbeEvent,
        kind: ProbeKind,
        listener: ProbeListener,
        callbacks: ProbeCallbacks,
    }
    Ping { id: u16 } => on_ping / on_ping;
    Moved { id: u16, delta: f32 } => on_moved / on_moved;
    Idle {} => on_idle / on_idle;
}

pub type Log = Arc<Mutex<Vec<String>>>;

pub fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

/// Appends `label:kind:id` for every event it sees.
pub struct Recorder {
    pub label: &'static str,
    pub log: Log,
}

impl Recorder {
    pub fn new(label: &'static str, log: &Log) -> Arc<dyn ProbeListener> {
        Arc::new(Self {
            label,
            log: Arc::clone(log),
        })
    }
}

impl ProbeListener for Recorder {
    fn on_ping(&self, id: u16) {
        self.log.lock().push(format!("{}:ping:{id}", self.label));
    }

    fn on_moved(&self, id: u16, _delta: f32) {
        self.log.lock().push(format!("{}:moved:{id}", self.label));
    }

    fn on_idle(&self) {
        self.log.lock().push(format!("{}:idle", self.label));
    }
}

/// Panics on every ping.
pub struct Faulty;

impl ProbeListener for Faulty {
    fn on_ping(&self, id: u16) {
        panic!("faulty listener rejected ping {id}");
    }
}
