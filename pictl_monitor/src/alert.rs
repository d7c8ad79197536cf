//! Stateless threshold evaluation.
//!
//! Pure functions only: given a sample and a ceiling, decide whether the
//! alert condition holds. Each metric is evaluated independently per
//! tick and every breach produces its own alert; there is no batching,
//! deduplication or cool-down here.

use pictl_common::metrics::MetricKind;

/// Outcome of one threshold evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The value exceeds its ceiling.
    Breach,
    /// The value is at or below its ceiling.
    NoBreach,
}

/// One reading headed for evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertSample {
    /// Metric kind.
    pub metric: MetricKind,
    /// Current value.
    pub value: f64,
    /// Source label (e.g., "system", "/", a sensor name).
    pub label: String,
}

impl AlertSample {
    /// Build a sample.
    pub fn new(metric: MetricKind, value: f64, label: impl Into<String>) -> Self {
        Self {
            metric,
            value,
            label: label.into(),
        }
    }
}

/// Evaluate one value against its ceiling. Strictly greater is a breach.
pub fn evaluate(value: f64, threshold: f64) -> Verdict {
    if value > threshold {
        Verdict::Breach
    } else {
        Verdict::NoBreach
    }
}

/// Render the operator-facing alert text for a breached sample.
pub fn alert_message(sample: &AlertSample, threshold: f64) -> String {
    let unit = sample.metric.unit();
    format!(
        "ALERT {} [{}]: {:.1}{unit} exceeds threshold {:.1}{unit}",
        sample.metric, sample.label, sample.value, threshold
    )
}
