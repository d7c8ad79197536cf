//! Contracts for external collaborators.
//!
//! The HAL and the monitor scheduler never talk to the chat transport,
//! the persistence layer or the OS inspection library directly; they go
//! through these traits. Implementations live at the edges (the console
//! binary, the monitor crate), which keeps the core testable with
//! scripted fakes.

use crate::metrics::{MetricSample, SensorReading};
use thiserror::Error;

/// Error type for notification delivery.
#[derive(Debug, Clone, Error)]
pub enum NotifyError {
    /// The underlying transport rejected or dropped the message.
    #[error("Notification transport error: {0}")]
    Transport(String),
}

/// Error type for metrics store operations.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store rejected a read or write.
    #[error("Metrics store error: {0}")]
    Backend(String),
}

/// Error type for OS resource inspection.
#[derive(Debug, Clone, Error)]
pub enum InspectError {
    /// The requested metric could not be collected.
    #[error("Failed to collect {metric}: {reason}")]
    Unavailable {
        /// Which metric failed.
        metric: &'static str,
        /// Backend-specific reason.
        reason: String,
    },
}

/// Outbound messaging transport (chat bot, webhook, log).
///
/// Callers must treat `send` as fallible and non-fatal: a delivery
/// failure is logged and the control or monitoring path continues.
pub trait Notifier: Send + Sync {
    /// Deliver one message to the operator.
    ///
    /// # Errors
    /// Returns `NotifyError::Transport` on delivery failure.
    fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Persistence for periodic metric samples.
///
/// The scheduler only produces samples; retention and schema belong to
/// the implementation.
pub trait MetricsStore: Send + Sync {
    /// Record one sample.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the sample could not be recorded.
    fn insert_sample(&self, sample: MetricSample) -> Result<(), StoreError>;

    /// Return samples from the last `hours` hours, oldest first.
    ///
    /// # Errors
    /// Returns `StoreError::Backend` if the window could not be read.
    fn recent(&self, hours: u64) -> Result<Vec<MetricSample>, StoreError>;
}

/// Black-box OS resource inspection (CPU, RAM, disk, temperatures).
///
/// Mutable because most backends cache state between refreshes.
pub trait ResourceInspector: Send {
    /// Global CPU utilization in percent.
    fn cpu_percent(&mut self) -> Result<f64, InspectError>;

    /// RAM utilization in percent.
    fn ram_percent(&mut self) -> Result<f64, InspectError>;

    /// Root filesystem utilization in percent.
    fn disk_percent(&mut self) -> Result<f64, InspectError>;

    /// All available temperature sensor readings.
    ///
    /// May be empty on platforms without exposed thermal sensors.
    fn temperatures(&mut self) -> Result<Vec<SensorReading>, InspectError>;
}
