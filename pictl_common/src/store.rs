//! In-process metrics store with rolling retention.
//!
//! Keeps the last 48 hours of samples in memory, matching the retention
//! the audit database applies on insert. Used directly in development
//! and as the reference implementation for [`MetricsStore`] in tests.

use crate::metrics::{MetricSample, unix_now};
use crate::traits::{MetricsStore, StoreError};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Retention window in seconds (48 hours).
const RETENTION_SECS: u64 = 172_800;

/// In-memory [`MetricsStore`] with a 48-hour rolling window.
pub struct MemoryStore {
    samples: Mutex<VecDeque<MetricSample>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
        }
    }

    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// True if no samples are retained.
    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsStore for MemoryStore {
    fn insert_sample(&self, sample: MetricSample) -> Result<(), StoreError> {
        let mut samples = self.samples.lock();
        samples.push_back(sample);

        // Drop rows older than the retention window, as the audit
        // database does on every insert.
        let cutoff = unix_now().saturating_sub(RETENTION_SECS);
        while samples.front().is_some_and(|s| s.timestamp < cutoff) {
            samples.pop_front();
        }
        Ok(())
    }

    fn recent(&self, hours: u64) -> Result<Vec<MetricSample>, StoreError> {
        let cutoff = unix_now().saturating_sub(hours.saturating_mul(3600));
        let samples = self.samples.lock();
        Ok(samples
            .iter()
            .filter(|s| s.timestamp > cutoff)
            .copied()
            .collect())
    }
}
