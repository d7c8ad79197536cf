//! Backend trait, operating mode and the real-backend probe.

use crate::device::{BinaryOutput, PwmOutput, TemperatureSensor};
use crate::error::HalError;
use std::fmt;

/// Process-wide operating mode, decided once at registry construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HalMode {
    /// Real hardware backend is active.
    Real,
    /// Simulated backend stands in for all devices.
    Mock,
}

impl fmt::Display for HalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalMode::Real => write!(f, "Real"),
            HalMode::Mock => write!(f, "Mock"),
        }
    }
}

/// A hardware backend: factory for per-device outputs and the board
/// temperature sensor.
///
/// The registry selects one backend at construction and keeps it for the
/// process lifetime; there is no hot-swap.
pub trait HalBackend: Send + Sync {
    /// Backend identifier (e.g., "simulation", "gpio").
    fn name(&self) -> &'static str;

    /// Open a binary output on the given pin.
    ///
    /// # Errors
    /// Returns `HalError::PinSetupFailed` if the pin cannot be claimed.
    fn open_binary(&self, pin: u8) -> Result<Box<dyn BinaryOutput>, HalError>;

    /// Open a PWM output on the given pin.
    ///
    /// # Errors
    /// Returns `HalError::PinSetupFailed` if the pin cannot be claimed.
    fn open_pwm(&self, pin: u8) -> Result<Box<dyn PwmOutput>, HalError>;

    /// Construct the board temperature sensor.
    fn temperature_sensor(&self) -> Box<dyn TemperatureSensor>;
}

/// Attempt to initialize the real hardware backend.
///
/// # Errors
/// Returns `HalError::HardwareUnavailable` when the crate was built
/// without the `gpio` feature or when the GPIO subsystem cannot be
/// opened (not a Pi, missing /dev/gpiomem, permissions). The caller
/// falls back to the simulated backend.
pub fn probe_real_backend() -> Result<Box<dyn HalBackend>, HalError> {
    #[cfg(feature = "gpio")]
    {
        let backend = crate::gpio::GpioBackend::probe()?;
        Ok(Box::new(backend))
    }
    #[cfg(not(feature = "gpio"))]
    {
        Err(HalError::HardwareUnavailable(
            "built without gpio support".to_string(),
        ))
    }
}
