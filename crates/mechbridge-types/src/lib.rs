//! Plain data shared by every hardware subsystem bridge.
//!
//! These are the argument types carried by event envelopes: sides, channels,
//! states, error kinds, and sensor readings.  They are `Copy` wherever the
//! hardware reports a fixed-size value so that envelopes stay cheap to clone
//! across the dispatcher/host thread boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Arm
// ────────────────────────────────────────────────────────────────────────────

/// Which arm an arm event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmSide {
    Both,
    Left,
    Right,
}

/// Motion state reported by the arm controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmState {
    Running,
    Completed,
    Error,
}

/// Reason an arm command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArmErrorType {
    Abort,
    Motor,
}

// ────────────────────────────────────────────────────────────────────────────
// Drive
// ────────────────────────────────────────────────────────────────────────────

/// Which drive motor an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveMotorSide {
    Both,
    Left,
    Right,
}

/// Reason a drive command failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveErrorType {
    Abort,
    /// Wheel stalled against an external force.
    Force,
    /// Heading correction could not converge.
    Rotate,
    Motor,
}

/// Drive controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveState {
    Running,
    Completed,
    Error,
}

/// The kind of drive command whose state changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriveType {
    Freestyle,
    Xy,
    Distance,
    Rotate,
}

// ────────────────────────────────────────────────────────────────────────────
// Servo
// ────────────────────────────────────────────────────────────────────────────

/// Auxiliary servo channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServoId {
    Servo0,
    Servo1,
}

// ────────────────────────────────────────────────────────────────────────────
// LED
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedSide {
    Both,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedErrorType {
    Abort,
}

// ────────────────────────────────────────────────────────────────────────────
// Touch
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchSide {
    Both,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchState {
    Up,
    Down,
}

/// Higher-level touch pattern recognised by the touch controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchActivity {
    Patting,
    Disturb,
}

// ────────────────────────────────────────────────────────────────────────────
// Time-of-flight proximity
// ────────────────────────────────────────────────────────────────────────────

/// Ranging status reported by a time-of-flight sensor.
///
/// Discriminants match the sensor's status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum TofError {
    NoError = 0,
    VcselContinuityTest = 1,
    VcselWatchdogTest = 2,
    VcselWatchdog = 3,
    Pll1Lock = 4,
    Pll2Lock = 5,
    EarlyConvergenceEstimate = 6,
    MaxConvergence = 7,
    NoTargetIgnore = 8,
    MaxSignalToNoiseRatio = 11,
    RawRangingAlgoUnderflow = 12,
    RawRangingAlgoOverflow = 13,
    RangingAlgoUnderflow = 14,
    RangingAlgoOverflow = 15,
    FilteredByPostProcessing = 16,
    DataNotReady = 18,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TofSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TofGestureType {
    Undefined,
    ObjectComing,
    ObjectGoing,
    Scrubbing,
    ToLeft,
    ToRight,
}

/// Gesture observed by one proximity sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TofGesture {
    pub gesture: TofGestureType,
    pub range_mm: i32,
}

/// A single ranging sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TofData {
    /// Sensor-clock timestamp of the sample in milliseconds.
    pub update_ms: i64,
    pub range_mm: i32,
    pub error: TofError,
    pub side: TofSide,
}

// ────────────────────────────────────────────────────────────────────────────
// Edge (cliff) sensors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GpioState {
    Low,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorId {
    BackLeft,
    BackRight,
    FrontLeft,
    FrontRight,
}

/// Reading of one downward-facing IR edge sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IrSensor {
    pub id: SensorId,
    pub state: GpioState,
}

/// Where a gap (table edge, stair) was detected relative to the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GapDirection {
    Front,
    FrontLeft,
    FrontRight,
    Back,
    BackLeft,
    BackRight,
    Left,
    Right,
    /// Front-left and back-right.
    CrossLeft,
    /// Front-right and back-left.
    CrossRight,
    All,
}

// ────────────────────────────────────────────────────────────────────────────
// IMU
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImuGesture {
    Undefined,
    Move,
    LongShake,
    ShortShake,
    Vibrate,
    VibrateExtreme,
    ShockLight,
    ShockMedium,
    ShockHard,
    ShockExtreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureDirection {
    Left,
    Right,
    Up,
    Down,
    Front,
    Back,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VectorFloat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct YawPitchRoll {
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

/// Orientation, linear acceleration and die temperature from the IMU.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ImuData {
    pub ypr: YawPitchRoll,
    pub linear_accel: VectorFloat,
    pub temperature: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// Error type for registration, lifecycle and host-side configuration.
///
/// Delivery-time consumer faults are deliberately absent: they are contained
/// at the trampoline boundary and only ever reported through diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BridgeError {
    #[error("Bridge Closed: {subsystem} has been torn down; call init before registering")]
    Closed { subsystem: String },

    #[error("Subsystem Fault on {subsystem}: status {code}: {details}")]
    Control {
        subsystem: String,
        code: i32,
        details: String,
    },

    #[error("Host Executor Error: {0}")]
    Executor(String),

    #[error("Configuration Error: {0}")]
    Config(String),
}

impl BridgeError {
    /// Build a [`BridgeError::Closed`] for the named subsystem.
    pub fn closed(subsystem: &str) -> Self {
        Self::Closed {
            subsystem: subsystem.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_error_display() {
        let err = BridgeError::closed("arm");
        assert!(err.to_string().contains("Bridge Closed"));
        assert!(err.to_string().contains("arm"));

        let err = BridgeError::Control {
            subsystem: "drive".to_string(),
            code: -1,
            details: "not active".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("drive"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn tof_error_discriminants_match_status_register() {
        assert_eq!(TofError::NoError as u8, 0);
        assert_eq!(TofError::MaxSignalToNoiseRatio as u8, 11);
        assert_eq!(TofError::DataNotReady as u8, 18);
    }

    #[test]
    fn imu_data_serializes_nested_fields() {
        let data = ImuData {
            ypr: YawPitchRoll {
                yaw: 1.0,
                pitch: 0.5,
                roll: -0.25,
            },
            linear_accel: VectorFloat::default(),
            temperature: 31.5,
        };
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["ypr"]["roll"], -0.25);
        assert_eq!(json["temperature"], 31.5);
    }

    #[test]
    fn bridge_error_roundtrips_through_json() {
        let err = BridgeError::Control {
            subsystem: "arm".to_string(),
            code: -2,
            details: "speed range".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: BridgeError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
