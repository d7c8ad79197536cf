//! Simulated backend.
//!
//! Implements every capability without touching physical I/O, with the
//! same clamp and state-derivation rules as the real backend. The
//! temperature sensor returns a base value plus bounded jitter; base,
//! bounds and RNG seed are injectable so tests stay reproducible.

use crate::backend::HalBackend;
use crate::device::{BinaryOutput, PwmOutput, TemperatureSensor, clamp_unit};
use crate::error::HalError;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Default simulated temperature base in Celsius.
pub const SIM_TEMP_BASE: f64 = 45.0;
/// Default jitter bounds added to the base, inclusive.
pub const SIM_TEMP_JITTER: (f64, f64) = (-2.0, 5.0);

/// In-memory binary output.
pub struct SimBinaryOutput {
    pin: u8,
    value: f64,
}

impl SimBinaryOutput {
    fn new(pin: u8) -> Self {
        Self { pin, value: 0.0 }
    }
}

impl BinaryOutput for SimBinaryOutput {
    fn turn_on(&mut self) -> Result<(), HalError> {
        self.value = 1.0;
        debug!("sim pin {} on", self.pin);
        Ok(())
    }

    fn turn_off(&mut self) -> Result<(), HalError> {
        self.value = 0.0;
        debug!("sim pin {} off", self.pin);
        Ok(())
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// In-memory PWM output.
pub struct SimPwmOutput {
    pin: u8,
    value: f64,
}

impl SimPwmOutput {
    fn new(pin: u8) -> Self {
        Self { pin, value: 0.0 }
    }
}

impl PwmOutput for SimPwmOutput {
    fn set_value(&mut self, value: f64) -> Result<(), HalError> {
        self.value = clamp_unit(value);
        debug!("sim pin {} value {:.3}", self.pin, self.value);
        Ok(())
    }

    fn value(&self) -> f64 {
        self.value
    }
}

/// Simulated temperature sensor: base plus uniform jitter per read.
pub struct SimTemperature {
    base: f64,
    jitter: (f64, f64),
    rng: StdRng,
}

impl SimTemperature {
    /// Sensor with the default base/jitter and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_bounds(SIM_TEMP_BASE, SIM_TEMP_JITTER, None)
    }

    /// Sensor with explicit base, jitter bounds and optional seed.
    pub fn with_bounds(base: f64, jitter: (f64, f64), seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { base, jitter, rng }
    }
}

impl Default for SimTemperature {
    fn default() -> Self {
        Self::new()
    }
}

impl TemperatureSensor for SimTemperature {
    fn read_celsius(&mut self) -> Result<f64, HalError> {
        let (lo, hi) = self.jitter;
        Ok(self.base + self.rng.gen_range(lo..=hi))
    }
}

/// Simulated backend: every opened device lives purely in memory.
pub struct SimBackend {
    temp_base: f64,
    temp_jitter: (f64, f64),
    temp_seed: Option<u64>,
}

impl SimBackend {
    /// Backend with default temperature behavior.
    pub fn new() -> Self {
        Self {
            temp_base: SIM_TEMP_BASE,
            temp_jitter: SIM_TEMP_JITTER,
            temp_seed: None,
        }
    }

    /// Backend with injected temperature behavior, for tests.
    pub fn with_temperature(base: f64, jitter: (f64, f64), seed: Option<u64>) -> Self {
        Self {
            temp_base: base,
            temp_jitter: jitter,
            temp_seed: seed,
        }
    }
}

impl Default for SimBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HalBackend for SimBackend {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn open_binary(&self, pin: u8) -> Result<Box<dyn BinaryOutput>, HalError> {
        Ok(Box::new(SimBinaryOutput::new(pin)))
    }

    fn open_pwm(&self, pin: u8) -> Result<Box<dyn PwmOutput>, HalError> {
        Ok(Box::new(SimPwmOutput::new(pin)))
    }

    fn temperature_sensor(&self) -> Box<dyn TemperatureSensor> {
        Box::new(SimTemperature::with_bounds(
            self.temp_base,
            self.temp_jitter,
            self.temp_seed,
        ))
    }
}
