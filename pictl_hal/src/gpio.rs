//! Real GPIO backend via `rppal`.
//!
//! Compiled only with the `gpio` feature. The probe fails cleanly when
//! the GPIO subsystem cannot be opened (not a Pi, missing /dev/gpiomem,
//! insufficient permissions), which drives the registry's mock fallback.
//!
//! Analog outputs use rppal's software PWM on a plain output pin; the
//! normalized value maps directly to the duty cycle.

use crate::backend::HalBackend;
use crate::device::{BinaryOutput, PwmOutput, TemperatureSensor, clamp_unit};
use crate::error::HalError;
use rppal::gpio::{Gpio, OutputPin};
use std::path::PathBuf;
use tracing::debug;

/// Software PWM frequency for analog outputs.
const PWM_FREQUENCY_HZ: f64 = 100.0;

/// SoC thermal zone exposing the CPU temperature in millidegrees.
const THERMAL_ZONE_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";

/// GPIO-backed binary output.
pub struct GpioBinaryOutput {
    pin: OutputPin,
    value: f64,
}

impl BinaryOutput for GpioBinaryOutput {
    fn turn_on(&mut self) -> Result<(), HalError> {
        self.pin.set_high();
        self.value = 1.0;
        Ok(())
    }

    fn turn_off(&mut self) -> Result<(), HalError> {
        self.pin.set_low();
        self.value = 0.0;
        Ok(())
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// GPIO-backed PWM output (software PWM).
pub struct GpioPwmOutput {
    pin: OutputPin,
    value: f64,
}

impl PwmOutput for GpioPwmOutput {
    fn set_value(&mut self, value: f64) -> Result<(), HalError> {
        let duty = clamp_unit(value);
        self.pin
            .set_pwm_frequency(PWM_FREQUENCY_HZ, duty)
            .map_err(|e| HalError::PinSetupFailed {
                pin: self.pin.pin(),
                reason: e.to_string(),
            })?;
        self.value = duty;
        Ok(())
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// CPU temperature from the SoC thermal zone.
pub struct ThermalZoneSensor {
    path: PathBuf,
}

impl ThermalZoneSensor {
    fn new() -> Self {
        Self {
            path: PathBuf::from(THERMAL_ZONE_PATH),
        }
    }
}

impl TemperatureSensor for ThermalZoneSensor {
    fn read_celsius(&mut self) -> Result<f64, HalError> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| HalError::SensorReadFailure(format!("{:?}: {e}", self.path)))?;
        let millidegrees: f64 = raw
            .trim()
            .parse()
            .map_err(|e| HalError::SensorReadFailure(format!("{:?}: {e}", self.path)))?;
        Ok(millidegrees / 1000.0)
    }
}

/// Real GPIO backend.
pub struct GpioBackend {
    gpio: Gpio,
}

impl GpioBackend {
    /// Open the GPIO subsystem.
    ///
    /// # Errors
    /// Returns `HalError::HardwareUnavailable` if rppal cannot open it.
    pub fn probe() -> Result<Self, HalError> {
        let gpio = Gpio::new().map_err(|e| HalError::HardwareUnavailable(e.to_string()))?;
        debug!("GPIO subsystem opened");
        Ok(Self { gpio })
    }

    fn claim_pin(&self, pin: u8) -> Result<OutputPin, HalError> {
        let pin = self
            .gpio
            .get(pin)
            .map_err(|e| HalError::PinSetupFailed {
                pin,
                reason: e.to_string(),
            })?
            .into_output();
        Ok(pin)
    }
}

impl HalBackend for GpioBackend {
    fn name(&self) -> &'static str {
        "gpio"
    }

    fn open_binary(&self, pin: u8) -> Result<Box<dyn BinaryOutput>, HalError> {
        let pin = self.claim_pin(pin)?;
        Ok(Box::new(GpioBinaryOutput { pin, value: 0.0 }))
    }

    fn open_pwm(&self, pin: u8) -> Result<Box<dyn PwmOutput>, HalError> {
        let pin = self.claim_pin(pin)?;
        Ok(Box::new(GpioPwmOutput { pin, value: 0.0 }))
    }

    fn temperature_sensor(&self) -> Box<dyn TemperatureSensor> {
        Box::new(ThermalZoneSensor::new())
    }
}
