//! Subsystem lifecycle: native control plus its event bridge.
//!
//! A [`Subsystem`] pairs an [`EventBridge`] with the [`SubsystemControl`]
//! that powers the hardware up and down.  The ordering is fixed: `init`
//! reopens the bridge before the hardware can raise anything, and `dispose`
//! tears the bridge down before the hardware is released.

use std::fmt;

use mechbridge_types::BridgeError;
use tracing::{info, warn};

use crate::bridge::EventBridge;
use crate::dispatcher::Dispatcher;
use crate::event::EventSet;

/// Native control of one hardware subsystem.
pub trait SubsystemControl: Send + Sync {
    /// Bring the subsystem up.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Control`] with the native status code on
    /// failure.
    fn init(&self) -> Result<(), BridgeError>;

    /// Release the subsystem's native resources.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Control`] with the native status code on
    /// failure.
    fn dispose(&self) -> Result<(), BridgeError>;

    fn is_active(&self) -> bool;
}

/// Map a native status code (`0` = success) to a result.
///
/// # Errors
///
/// Any non-zero `code` becomes [`BridgeError::Control`].
pub fn check_status(subsystem: &str, code: i32, operation: &str) -> Result<(), BridgeError> {
    if code == 0 {
        return Ok(());
    }
    Err(BridgeError::Control {
        subsystem: subsystem.to_string(),
        code,
        details: format!("{operation} failed"),
    })
}

pub struct Subsystem<S: EventSet, D: Dispatcher<S>, C: SubsystemControl> {
    bridge: EventBridge<S, D>,
    control: C,
}

impl<S: EventSet, D: Dispatcher<S>, C: SubsystemControl> Subsystem<S, D, C> {
    pub fn new(bridge: EventBridge<S, D>, control: C) -> Self {
        Self { bridge, control }
    }

    /// Reopen the bridge, then initialise the hardware.
    ///
    /// # Errors
    ///
    /// Propagates the control's init failure.  The bridge stays open so a
    /// retry does not need to re-register anything.
    pub fn init(&self) -> Result<(), BridgeError> {
        self.bridge.reopen();
        self.control.init()?;
        info!(subsystem = S::NAME, "subsystem initialised");
        Ok(())
    }

    /// Tear down the bridge, then release the hardware.
    ///
    /// # Errors
    ///
    /// Propagates the control's dispose failure.  The bridge is torn down
    /// regardless.
    pub fn dispose(&self) -> Result<(), BridgeError> {
        self.bridge.clear_listeners();
        if let Err(e) = self.control.dispose() {
            warn!(subsystem = S::NAME, error = %e, "native dispose failed");
            return Err(e);
        }
        info!(subsystem = S::NAME, "subsystem disposed");
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.control.is_active()
    }

    pub fn bridge(&self) -> &EventBridge<S, D> {
        &self.bridge
    }

    pub fn control(&self) -> &C {
        &self.control
    }
}

impl<S: EventSet, D: Dispatcher<S>, C: SubsystemControl + fmt::Debug> fmt::Debug
    for Subsystem<S, D, C>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subsystem")
            .field("bridge", &self.bridge)
            .field("control", &self.control)
            .finish()
    }
}
