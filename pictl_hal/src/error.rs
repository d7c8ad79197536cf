//! HAL error taxonomy.
//!
//! None of these are fatal to the process. The registry converts every
//! variant into a logged no-op, a sentinel value or a partial result at
//! its public surface; the typed errors exist for the internal seams and
//! for callers that opt into them.

use thiserror::Error;

/// Error types for HAL operations.
#[derive(Debug, Clone, Error)]
pub enum HalError {
    /// Real hardware backend could not initialize; mock fallback applies.
    #[error("Hardware backend unavailable: {0}")]
    HardwareUnavailable(String),

    /// Operation addressed a device name that was never registered.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Backend failed to open the requested pin.
    #[error("Failed to setup pin {pin}: {reason}")]
    PinSetupFailed {
        /// Physical pin address.
        pin: u8,
        /// Backend-specific reason.
        reason: String,
    },

    /// Temperature sensor read failed.
    #[error("Sensor read failed: {0}")]
    SensorReadFailure(String),

    /// One vendor diagnostic query failed; others may have succeeded.
    #[error("Diagnostic query '{query}' failed: {reason}")]
    DiagnosticQueryFailure {
        /// Logical query name (e.g., "throttled").
        query: &'static str,
        /// Underlying failure description.
        reason: String,
    },
}
