//! `mechbridge-hal` – Subsystem Event Bridges
//!
//! One module per hardware subsystem of the robot.  Each declares its events
//! with [`mechbridge_core::event_set!`] and gets, for free:
//!
//! - an envelope enum (`ArmEvent`, `DriveEvent`, …) and a kind enum,
//! - a listener trait with a default no-op method per kind
//!   (`ArmEventListener::on_complete`, …),
//! - a callbacks trait adding typed `on_…` setters to
//!   [`EventBridge`][mechbridge_core::EventBridge].
//!
//! [`sim`] provides [`SimControl`][sim::SimControl], a stand-in for the
//! native init/dispose calls, so a whole subsystem can run without hardware.
//!
//! # Example
//!
//! ```rust
//! use mechbridge_core::HostContext;
//! use mechbridge_hal::arm::{ArmCallbacks, ArmEvent};
//! use mechbridge_hal::sim::sim_subsystem;
//! use mechbridge_types::ArmSide;
//!
//! let (dispatcher, arm) = sim_subsystem::<mechbridge_hal::arm::Arm>(HostContext::exclusive());
//! arm.init().unwrap();
//! arm.bridge()
//!     .on_complete(|id, side| println!("arm move {id} finished on {side:?}"))
//!     .unwrap();
//!
//! dispatcher.fire(&ArmEvent::Complete { id: 7, side: ArmSide::Left });
//! assert_eq!(arm.bridge().stats().delivered, 1);
//! arm.dispose().unwrap();
//! ```

pub mod arm;
pub mod drive;
pub mod edge;
pub mod eye;
pub mod imu;
pub mod led;
pub mod servo;
pub mod sim;
pub mod sound;
pub mod tof;
pub mod touch;

#[cfg(test)]
mod testing;
