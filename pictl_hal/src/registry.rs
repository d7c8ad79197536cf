//! The device registry: single source of truth for device state.
//!
//! Constructed once at process start and shared as `Arc<DeviceRegistry>`
//! between the command-serving context and the monitor scheduler. The
//! device map sits behind one mutex with short critical sections; no
//! operation here blocks on I/O while holding it.
//!
//! Every public operation is total. An uncaught fault at this layer
//! would terminate the whole control loop, so hardware faults become
//! logged no-ops, sentinel values or partial results instead.

use crate::backend::{HalBackend, HalMode, probe_real_backend};
use crate::device::{Device, DeviceInfo, DeviceKind, TemperatureSensor};
use crate::diag::{self, BoardDiagnostics};
use crate::error::HalError;
use crate::sim::SimBackend;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::{error, info, warn};

/// Registry of logical devices backed by one hardware backend.
pub struct DeviceRegistry {
    mode: HalMode,
    backend: Box<dyn HalBackend>,
    devices: Mutex<HashMap<String, Device>>,
    temperature: Mutex<Box<dyn TemperatureSensor>>,
}

impl DeviceRegistry {
    /// Probe the real backend and construct the registry.
    ///
    /// The probe happens exactly once; on any failure the simulated
    /// backend serves all devices created afterwards and the mode is
    /// `Mock` for the remainder of the process.
    pub fn initialize() -> Self {
        match probe_real_backend() {
            Ok(backend) => {
                info!("Hardware backend '{}' loaded, running in REAL mode", backend.name());
                Self::with_backend(backend, HalMode::Real)
            }
            Err(e) => {
                warn!("Hardware backend unavailable ({e}), running in MOCK mode");
                Self::with_backend(Box::new(SimBackend::new()), HalMode::Mock)
            }
        }
    }

    /// Construct with an explicit backend and mode.
    ///
    /// Used by `--simulate` and by tests; `initialize()` is the normal
    /// entry point.
    pub fn with_backend(backend: Box<dyn HalBackend>, mode: HalMode) -> Self {
        let temperature = Mutex::new(backend.temperature_sensor());
        Self {
            mode,
            backend,
            devices: Mutex::new(HashMap::new()),
            temperature,
        }
    }

    /// Operating mode decided at construction.
    pub fn mode(&self) -> HalMode {
        self.mode
    }

    /// True when the simulated backend serves all devices.
    pub fn is_mock(&self) -> bool {
        self.mode == HalMode::Mock
    }

    /// Register a device, idempotent by name.
    ///
    /// If `name` already exists the existing device is returned and
    /// `pin`/`kind` are ignored; the kind of a registered device never
    /// changes. On backend failure this logs and returns `None` so the
    /// caller can treat the device as absent. Never panics.
    pub fn setup(&self, pin: u8, name: &str, kind: DeviceKind) -> Option<DeviceInfo> {
        let mut devices = self.devices.lock();

        if let Some(existing) = devices.get(name) {
            return Some(DeviceInfo::snapshot(name, existing));
        }

        let opened = match kind {
            DeviceKind::Binary => self.backend.open_binary(pin).map(|out| Device::binary(pin, out)),
            DeviceKind::Pwm => self.backend.open_pwm(pin).map(|out| Device::pwm(pin, out)),
        };

        match opened {
            Ok(device) => {
                let info = DeviceInfo::snapshot(name, &device);
                devices.insert(name.to_string(), device);
                info!("Setup pin {pin} as '{name}' ({kind:?})");
                Some(info)
            }
            Err(e) => {
                error!("Failed to setup pin {pin} as '{name}': {e}");
                None
            }
        }
    }

    /// Apply a scalar command to a named device.
    ///
    /// Unknown names are a logged no-op; hardware faults are logged and
    /// swallowed. The control path never crashes here.
    pub fn set_state(&self, name: &str, value: f64) {
        match self.try_set_state(name, value) {
            Ok(()) => {}
            Err(HalError::DeviceNotFound(name)) => {
                warn!("Attempted to control unknown device '{name}'");
            }
            Err(e) => {
                error!("Error setting '{name}' to {value}: {e}");
            }
        }
    }

    /// Switch a binary device (or drive a PWM device to full/zero).
    pub fn set_on(&self, name: &str, on: bool) {
        self.set_state(name, if on { 1.0 } else { 0.0 });
    }

    /// Typed variant of [`set_state`](Self::set_state) for callers that
    /// need the error.
    ///
    /// # Errors
    /// Returns `HalError::DeviceNotFound` for unregistered names, or the
    /// backend fault for hardware errors.
    pub fn try_set_state(&self, name: &str, value: f64) -> Result<(), HalError> {
        let mut devices = self.devices.lock();
        let device = devices
            .get_mut(name)
            .ok_or_else(|| HalError::DeviceNotFound(name.to_string()))?;
        device.apply_scalar(value)
    }

    /// Board temperature in Celsius.
    ///
    /// Returns `0.0` on a sensor failure; callers must treat `0.0` as
    /// "unavailable", not as a genuine freezing reading.
    pub fn read_temperature(&self) -> f64 {
        match self.temperature.lock().read_celsius() {
            Ok(celsius) => celsius,
            Err(e) => {
                error!("Error reading temperature: {e}");
                0.0
            }
        }
    }

    /// Snapshot of every registered device, sorted by name.
    pub fn devices(&self) -> Vec<DeviceInfo> {
        let devices = self.devices.lock();
        let mut infos: Vec<DeviceInfo> = devices
            .iter()
            .map(|(name, device)| DeviceInfo::snapshot(name, device))
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Board power/clock/throttle diagnostics.
    ///
    /// Mock mode returns fixed, labeled values; real mode runs the
    /// vendor queries with per-query fault isolation.
    pub fn diagnostics(&self) -> BoardDiagnostics {
        diag::collect(self.mode)
    }
}
