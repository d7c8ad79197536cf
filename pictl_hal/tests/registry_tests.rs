//! Device registry behavior tests.
//!
//! Runs everything against the simulated backend so the suite passes on
//! any machine: idempotent setup, scalar dispatch per kind, clamping,
//! unknown-device no-ops, mock temperature bounds and mock diagnostics.

use pictl_hal::sim::SimBackend;
use pictl_hal::{DeviceKind, DeviceRegistry, HalError, HalMode};

fn mock_registry() -> DeviceRegistry {
    let backend = SimBackend::with_temperature(45.0, (-2.0, 5.0), Some(1234));
    DeviceRegistry::with_backend(Box::new(backend), HalMode::Mock)
}

// ─── Registration ───────────────────────────────────────────────────

#[test]
fn setup_registers_device() {
    let registry = mock_registry();
    let info = registry.setup(18, "fan", DeviceKind::Binary).expect("setup");
    assert_eq!(info.name, "fan");
    assert_eq!(info.pin, 18);
    assert_eq!(info.kind, DeviceKind::Binary);
    assert_eq!(info.value, 0.0);
    assert!(!info.state);
}

#[test]
fn setup_is_idempotent_by_name() {
    let registry = mock_registry();
    registry.setup(18, "fan", DeviceKind::Binary).expect("first setup");
    registry.set_on("fan", true);

    // Re-registering with a different pin and kind returns the existing
    // device untouched.
    let again = registry.setup(12, "fan", DeviceKind::Pwm).expect("re-setup");
    assert_eq!(again.pin, 18);
    assert_eq!(again.kind, DeviceKind::Binary);
    assert!(again.state);
    assert_eq!(registry.devices().len(), 1);
}

// ─── Scalar dispatch ────────────────────────────────────────────────

#[test]
fn binary_state_follows_input_exactly() {
    let registry = mock_registry();
    registry.setup(18, "relay", DeviceKind::Binary).unwrap();

    registry.set_on("relay", true);
    let info = &registry.devices()[0];
    assert!(info.state);
    assert_eq!(info.value, 1.0);

    registry.set_on("relay", false);
    let info = &registry.devices()[0];
    assert!(!info.state);
    assert_eq!(info.value, 0.0);
}

#[test]
fn binary_treats_any_nonzero_scalar_as_on() {
    let registry = mock_registry();
    registry.setup(18, "relay", DeviceKind::Binary).unwrap();
    registry.set_state("relay", 0.3);
    assert!(registry.devices()[0].state);
}

#[test]
fn pwm_clamps_out_of_range_values() {
    let registry = mock_registry();
    registry.setup(12, "led", DeviceKind::Pwm).unwrap();

    registry.set_state("led", 1.7);
    let info = &registry.devices()[0];
    assert_eq!(info.value, 1.0);
    assert!(info.state);

    registry.set_state("led", -0.4);
    let info = &registry.devices()[0];
    assert_eq!(info.value, 0.0);
    assert!(!info.state);

    registry.set_state("led", 0.5);
    let info = &registry.devices()[0];
    assert_eq!(info.value, 0.5);
    assert_eq!(info.state, info.value > 0.0);
}

#[test]
fn unknown_device_is_a_noop() {
    let registry = mock_registry();
    registry.setup(18, "fan", DeviceKind::Binary).unwrap();

    // Must not panic and must leave the registry unchanged.
    registry.set_state("ghost", 1.0);
    let devices = registry.devices();
    assert_eq!(devices.len(), 1);
    assert!(!devices[0].state);
}

#[test]
fn try_set_state_reports_unknown_device() {
    let registry = mock_registry();
    assert!(matches!(
        registry.try_set_state("ghost", 1.0),
        Err(HalError::DeviceNotFound(_))
    ));
}

// ─── Temperature ────────────────────────────────────────────────────

#[test]
fn mock_temperature_stays_in_documented_bounds() {
    let registry = mock_registry();
    for _ in 0..200 {
        let t = registry.read_temperature();
        assert!((43.0..=50.0).contains(&t), "out of bounds: {t}");
    }
}

// ─── Diagnostics ────────────────────────────────────────────────────

#[test]
fn mock_diagnostics_always_complete() {
    let registry = mock_registry();
    let diag = registry.diagnostics();
    assert!(diag.is_complete());
    assert!(diag.errors.is_empty());
    assert!(!diag.throttle_warning());
    assert_eq!(diag.throttled.as_deref(), Some("0x0 (Mock)"));
    assert_eq!(diag.volt_core.as_deref(), Some("1.2000V (Mock)"));
    assert_eq!(diag.clock_arm.as_deref(), Some("1500000000 (Mock)"));
}

// ─── Mode fallback ──────────────────────────────────────────────────

#[cfg(not(feature = "gpio"))]
#[test]
fn initialize_without_gpio_support_falls_back_to_mock() {
    let registry = DeviceRegistry::initialize();
    assert_eq!(registry.mode(), HalMode::Mock);
    assert!(registry.is_mock());

    // Devices registered after the fallback are simulated and fully
    // functional.
    let info = registry.setup(18, "fan", DeviceKind::Binary).expect("setup");
    assert_eq!(info.kind, DeviceKind::Binary);
    registry.set_on("fan", true);
    assert!(registry.devices()[0].state);
}
