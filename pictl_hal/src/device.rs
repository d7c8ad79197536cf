//! Device capability traits and the tagged device slot.
//!
//! A registered device is either a binary actuator or an analog (PWM)
//! actuator; the kind is fixed at registration and dispatch happens on
//! the stored tag, never on runtime type inspection. Output values are
//! normalized to [0.0, 1.0] and `state` is derived from `value`, not
//! independently settable.

use crate::error::HalError;
use serde::{Deserialize, Serialize};

/// Device kind, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeviceKind {
    /// On/off actuator with no intermediate states.
    Binary,
    /// Analog actuator with a normalized output in [0.0, 1.0].
    Pwm,
}

/// Binary (on/off) output capability.
pub trait BinaryOutput: Send {
    /// Drive the output high.
    ///
    /// # Errors
    /// Returns `HalError` on a hardware fault.
    fn turn_on(&mut self) -> Result<(), HalError>;

    /// Drive the output low.
    ///
    /// # Errors
    /// Returns `HalError` on a hardware fault.
    fn turn_off(&mut self) -> Result<(), HalError>;

    /// Current normalized value (0.0 or 1.0).
    fn value(&self) -> f64;
}

/// Analog (PWM) output capability.
pub trait PwmOutput: Send {
    /// Set the duty cycle. Implementations clamp to [0.0, 1.0] silently;
    /// out-of-range input is never an error.
    ///
    /// # Errors
    /// Returns `HalError` on a hardware fault.
    fn set_value(&mut self, value: f64) -> Result<(), HalError>;

    /// Current normalized value in [0.0, 1.0].
    fn value(&self) -> f64;
}

/// Temperature sensor capability.
///
/// The trait itself is fallible so backends can report real faults; the
/// registry maps failures to the `0.0` sentinel at its public surface.
pub trait TemperatureSensor: Send {
    /// Read the temperature in degrees Celsius.
    ///
    /// # Errors
    /// Returns `HalError::SensorReadFailure` if the reading failed.
    fn read_celsius(&mut self) -> Result<f64, HalError>;
}

/// Clamp a scalar to the normalized output range.
///
/// Non-finite input collapses to 0.0 so bad values can never reach an
/// actuator.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Tagged output slot; dispatch target for `set_state`.
enum DeviceSlot {
    Binary(Box<dyn BinaryOutput>),
    Pwm(Box<dyn PwmOutput>),
}

/// One registered device: pin address plus its output slot.
pub struct Device {
    pin: u8,
    slot: DeviceSlot,
}

impl Device {
    /// Wrap a binary output.
    pub fn binary(pin: u8, output: Box<dyn BinaryOutput>) -> Self {
        Self {
            pin,
            slot: DeviceSlot::Binary(output),
        }
    }

    /// Wrap a PWM output.
    pub fn pwm(pin: u8, output: Box<dyn PwmOutput>) -> Self {
        Self {
            pin,
            slot: DeviceSlot::Pwm(output),
        }
    }

    /// Physical pin address, assigned once at registration.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Device kind.
    pub fn kind(&self) -> DeviceKind {
        match self.slot {
            DeviceSlot::Binary(_) => DeviceKind::Binary,
            DeviceSlot::Pwm(_) => DeviceKind::Pwm,
        }
    }

    /// Current normalized output value.
    pub fn value(&self) -> f64 {
        match &self.slot {
            DeviceSlot::Binary(out) => out.value(),
            DeviceSlot::Pwm(out) => out.value(),
        }
    }

    /// Derived state: binary `value != 0`, PWM `value > 0`.
    pub fn state(&self) -> bool {
        match &self.slot {
            DeviceSlot::Binary(out) => out.value() != 0.0,
            DeviceSlot::Pwm(out) => out.value() > 0.0,
        }
    }

    /// Apply a scalar command, interpreted per kind: binary devices
    /// switch on iff the value is non-zero, PWM devices clamp and store.
    ///
    /// # Errors
    /// Returns `HalError` only on a hardware fault, never for
    /// out-of-range input.
    pub fn apply_scalar(&mut self, value: f64) -> Result<(), HalError> {
        match &mut self.slot {
            DeviceSlot::Binary(out) => {
                if value != 0.0 {
                    out.turn_on()
                } else {
                    out.turn_off()
                }
            }
            DeviceSlot::Pwm(out) => out.set_value(value),
        }
    }
}

/// Read-only snapshot of a registered device.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    /// Logical device name.
    pub name: String,
    /// Physical pin address.
    pub pin: u8,
    /// Device kind.
    pub kind: DeviceKind,
    /// Current normalized value.
    pub value: f64,
    /// Derived on/off state.
    pub state: bool,
}

impl DeviceInfo {
    /// Snapshot a device under its registered name.
    pub fn snapshot(name: &str, device: &Device) -> Self {
        Self {
            name: name.to_string(),
            pin: device.pin(),
            kind: device.kind(),
            value: device.value(),
            state: device.state(),
        }
    }
}
