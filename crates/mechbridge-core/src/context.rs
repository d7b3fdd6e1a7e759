//! [`HostContext`] – the host runtime's exclusive execution context.
//!
//! Consumer code (callbacks and listener methods) belongs to a host runtime
//! that tolerates only one thread executing it at a time.  Every trampoline
//! must therefore run consumer code *inside* the host context, and at most
//! one trampoline may be inside it at any moment, across all subsystems that
//! share the context.
//!
//! Two execution strategies are provided:
//!
//! | [`DeliveryMode`] | Behaviour |
//! |---|---|
//! | `Inline` | The dispatcher thread acquires a process-wide re-entrant lock and runs the job itself. |
//! | `Channel` | The dispatcher thread enqueues the job on a single-consumer channel; one executor thread owns the host runtime and runs jobs in arrival order. |
//!
//! Both strategies are re-entrant: a job that synchronously triggers another
//! delivery on the same thread runs it immediately instead of deadlocking.
//!
//! Acquiring the context is the only blocking step of a delivery.
//! Registration and removal never request it.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};
use std::thread::{self, ThreadId};

use mechbridge_types::BridgeError;
use parking_lot::{ReentrantMutex, ReentrantMutexGuard};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::panic_message;

/// A unit of work that must run inside the host context.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Default name of the executor thread in [`DeliveryMode::Channel`].
pub const DEFAULT_EXECUTOR_NAME: &str = "mechbridge-host";

/// How trampolines enter the host context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// Run on the dispatcher thread under an exclusive re-entrant lock.
    #[default]
    Inline,
    /// Hand off to a dedicated executor thread over a channel.
    Channel,
}

impl fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryMode::Inline => write!(f, "inline"),
            DeliveryMode::Channel => write!(f, "channel"),
        }
    }
}

enum ContextInner {
    Exclusive(ReentrantMutex<()>),
    Channel {
        sender: mpsc::UnboundedSender<Job>,
        executor: ThreadId,
        name: String,
    },
}

/// Cheaply clonable handle to a host execution context.
#[derive(Clone)]
pub struct HostContext {
    inner: Arc<ContextInner>,
}

static GLOBAL: OnceLock<HostContext> = OnceLock::new();

impl HostContext {
    /// The process-wide inline context shared by every bridge that does not
    /// ask for a dedicated one.
    pub fn global() -> Self {
        GLOBAL.get_or_init(Self::exclusive).clone()
    }

    /// A fresh inline context, independent of [`HostContext::global`].
    pub fn exclusive() -> Self {
        Self {
            inner: Arc::new(ContextInner::Exclusive(ReentrantMutex::new(()))),
        }
    }

    /// Spawn an executor thread named `thread_name` and return a
    /// channel-backed context feeding it.
    ///
    /// The thread exits once every clone of the returned context (and every
    /// job still holding one) has been dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Executor`] when the thread cannot be spawned.
    pub fn channel(thread_name: &str) -> Result<Self, BridgeError> {
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();
        let name = thread_name.to_string();
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                while let Some(job) = receiver.blocking_recv() {
                    if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
                        error!(
                            panic = %panic_message(payload.as_ref()),
                            "job panicked on host executor"
                        );
                    }
                }
                debug!("host executor channel closed; exiting");
            })
            .map_err(|e| BridgeError::Executor(format!("failed to spawn '{thread_name}': {e}")))?;
        let executor = handle.thread().id();
        Ok(Self {
            inner: Arc::new(ContextInner::Channel {
                sender,
                executor,
                name,
            }),
        })
    }

    /// Build a context for `mode`.  Inline mode returns
    /// [`HostContext::global`].
    ///
    /// # Errors
    ///
    /// See [`HostContext::channel`].
    pub fn from_mode(mode: DeliveryMode, thread_name: &str) -> Result<Self, BridgeError> {
        match mode {
            DeliveryMode::Inline => Ok(Self::global()),
            DeliveryMode::Channel => Self::channel(thread_name),
        }
    }

    /// The strategy this context uses.
    pub fn mode(&self) -> DeliveryMode {
        match &*self.inner {
            ContextInner::Exclusive(_) => DeliveryMode::Inline,
            ContextInner::Channel { .. } => DeliveryMode::Channel,
        }
    }

    /// Run `job` inside the host context.
    ///
    /// Inline contexts block until the context is free and run the job on
    /// the calling thread.  Channel contexts enqueue the job and return
    /// immediately, unless called from the executor thread itself, in which
    /// case the job runs in place.
    pub fn execute<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match &*self.inner {
            ContextInner::Exclusive(lock) => {
                let _guard = lock.lock();
                job();
            }
            ContextInner::Channel {
                sender,
                executor,
                name,
            } => {
                if thread::current().id() == *executor {
                    job();
                    return;
                }
                if sender.send(Box::new(job)).is_err() {
                    warn!(executor = %name, "host executor has stopped; dropping job");
                }
            }
        }
    }

    /// Hold an inline context from host-side code, as the host runtime does
    /// while it is busy executing its own code.  Deliveries block until the
    /// guard is dropped.  Returns `None` for channel contexts.
    pub fn hold(&self) -> Option<HostGuard<'_>> {
        match &*self.inner {
            ContextInner::Exclusive(lock) => Some(HostGuard {
                _guard: lock.lock(),
            }),
            ContextInner::Channel { .. } => None,
        }
    }

    /// Block until every job enqueued before this call has run.  No-op for
    /// inline contexts.
    ///
    /// Must not be called from inside an async runtime.
    pub fn flush(&self) {
        if let ContextInner::Channel { .. } = &*self.inner {
            let (done, wait) = oneshot::channel::<()>();
            self.execute(move || {
                let _ = done.send(());
            });
            let _ = wait.blocking_recv();
        }
    }

    /// `true` when both handles refer to the same underlying context.
    pub fn same_as(&self, other: &HostContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HostContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.inner {
            ContextInner::Exclusive(_) => f.debug_struct("HostContext").field("mode", &"inline").finish(),
            ContextInner::Channel { name, .. } => f
                .debug_struct("HostContext")
                .field("mode", &"channel")
                .field("executor", name)
                .finish(),
        }
    }
}

/// Host-side hold on an inline [`HostContext`].  See [`HostContext::hold`].
pub struct HostGuard<'a> {
    _guard: ReentrantMutexGuard<'a, ()>,
}
