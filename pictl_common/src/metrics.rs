//! Metric kinds, samples and sensor readings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Kind of metric evaluated by the alert engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    /// CPU utilization in percent.
    Cpu,
    /// Temperature in degrees Celsius.
    Temperature,
    /// Disk utilization in percent.
    Disk,
}

impl MetricKind {
    /// Unit suffix used when rendering values of this kind.
    pub fn unit(&self) -> &'static str {
        match self {
            MetricKind::Cpu | MetricKind::Disk => "%",
            MetricKind::Temperature => "°C",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Cpu => write!(f, "CPU"),
            MetricKind::Temperature => write!(f, "Temperature"),
            MetricKind::Disk => write!(f, "Disk"),
        }
    }
}

/// One labeled temperature reading from a sensor source.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    /// Sensor label (e.g., "cpu", "nvme0").
    pub label: String,
    /// Reading in degrees Celsius.
    pub celsius: f64,
}

/// One row of system metrics recorded per scheduler tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// Unix timestamp in seconds.
    pub timestamp: u64,
    /// CPU utilization in percent.
    pub cpu_percent: f64,
    /// RAM utilization in percent.
    pub ram_percent: f64,
    /// Disk utilization in percent.
    pub disk_percent: f64,
    /// CPU temperature in degrees Celsius.
    pub temp_celsius: f64,
}

/// Current Unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_kind_units() {
        assert_eq!(MetricKind::Cpu.unit(), "%");
        assert_eq!(MetricKind::Disk.unit(), "%");
        assert_eq!(MetricKind::Temperature.unit(), "°C");
    }

    #[test]
    fn metric_kind_display() {
        assert_eq!(MetricKind::Cpu.to_string(), "CPU");
        assert_eq!(MetricKind::Temperature.to_string(), "Temperature");
    }
}
