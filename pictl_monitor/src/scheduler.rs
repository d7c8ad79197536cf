//! The periodic monitor scheduler.
//!
//! Runs on its own thread from process start until shutdown. Ticks are
//! strictly sequential; a slow tick delays the next one but never
//! overlaps it. Every collection, the store write and the notifier call
//! are individually fault-isolated: an error is logged, that step is
//! skipped and the loop continues. The interval is slept in short
//! slices so the stop flag is honored promptly.

use crate::alert::{AlertSample, Verdict, alert_message, evaluate};
use pictl_common::config::{MonitorConfig, Thresholds};
use pictl_common::metrics::{MetricKind, MetricSample, unix_now};
use pictl_common::traits::{MetricsStore, Notifier, ResourceInspector};
use pictl_hal::DeviceRegistry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Sleep slice between stop-flag checks while waiting for the next tick.
const STOP_POLL: Duration = Duration::from_millis(200);

/// Periodic threshold monitor.
pub struct MonitorScheduler {
    registry: Arc<DeviceRegistry>,
    inspector: Box<dyn ResourceInspector>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn MetricsStore>,
    thresholds: Thresholds,
    interval: Duration,
    running: Arc<AtomicBool>,
    tick_count: u64,
}

impl MonitorScheduler {
    /// Build a scheduler from its collaborators and the monitor config.
    pub fn new(
        registry: Arc<DeviceRegistry>,
        inspector: Box<dyn ResourceInspector>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn MetricsStore>,
        config: &MonitorConfig,
    ) -> Self {
        Self {
            registry,
            inspector,
            notifier,
            store,
            thresholds: config.thresholds,
            interval: Duration::from_secs(config.interval_secs),
            running: Arc::new(AtomicBool::new(false)),
            tick_count: 0,
        }
    }

    /// Override the tick interval (tests and development).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Execute one tick: collect every metric, evaluate, record.
    ///
    /// Public so the wiring layer can force an immediate evaluation and
    /// so tests can drive ticks without the thread.
    pub fn run_once(&mut self) {
        self.tick_count += 1;
        let tick = self.tick_count;

        let cpu = match self.inspector.cpu_percent() {
            Ok(value) => {
                self.evaluate_sample(
                    AlertSample::new(MetricKind::Cpu, value, "system"),
                    self.thresholds.cpu_percent,
                );
                Some(value)
            }
            Err(e) => {
                warn!("Tick {tick}: CPU collection failed: {e}");
                None
            }
        };

        let disk = match self.inspector.disk_percent() {
            Ok(value) => {
                self.evaluate_sample(
                    AlertSample::new(MetricKind::Disk, value, "/"),
                    self.thresholds.disk_percent,
                );
                Some(value)
            }
            Err(e) => {
                warn!("Tick {tick}: disk collection failed: {e}");
                None
            }
        };

        let ram = match self.inspector.ram_percent() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Tick {tick}: RAM collection failed: {e}");
                None
            }
        };

        // Board sensor; read_temperature is total and reports 0.0 when
        // the sensor is unavailable, which never breaches.
        let board_temp = self.registry.read_temperature();
        self.evaluate_sample(
            AlertSample::new(MetricKind::Temperature, board_temp, "cpu"),
            self.thresholds.temperature_celsius,
        );

        // Additional sensor sources; each reading alerts independently.
        match self.inspector.temperatures() {
            Ok(readings) => {
                for reading in readings {
                    self.evaluate_sample(
                        AlertSample::new(
                            MetricKind::Temperature,
                            reading.celsius,
                            reading.label.as_str(),
                        ),
                        self.thresholds.temperature_celsius,
                    );
                }
            }
            Err(e) => {
                warn!("Tick {tick}: temperature collection failed: {e}");
            }
        }

        let sample = MetricSample {
            timestamp: unix_now(),
            cpu_percent: cpu.unwrap_or(0.0),
            ram_percent: ram.unwrap_or(0.0),
            disk_percent: disk.unwrap_or(0.0),
            temp_celsius: board_temp,
        };
        if let Err(e) = self.store.insert_sample(sample) {
            warn!("Tick {tick}: failed to record sample: {e}");
        }

        debug!(
            "Tick {tick}: cpu={:?} ram={:?} disk={:?} temp={:.1}",
            cpu, ram, disk, board_temp
        );
    }

    /// Evaluate one sample and notify on breach. Notifier faults are
    /// logged, never propagated.
    fn evaluate_sample(&self, sample: AlertSample, threshold: f64) {
        if evaluate(sample.value, threshold) == Verdict::Breach {
            let message = alert_message(&sample, threshold);
            warn!("{message}");
            if let Err(e) = self.notifier.send(&message) {
                warn!("Alert notification failed: {e}");
            }
        }
    }

    /// Start the background loop.
    ///
    /// # Errors
    /// Returns an I/O error if the OS refuses to spawn the thread.
    pub fn spawn(mut self) -> std::io::Result<MonitorHandle> {
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let interval = self.interval;

        let handle = std::thread::Builder::new()
            .name("pictl-monitor".to_string())
            .spawn(move || {
                info!("Monitor scheduler started (interval={:?})", interval);
                while self.running.load(Ordering::SeqCst) {
                    let tick_start = Instant::now();
                    self.run_once();

                    // Wait out the rest of the interval, checking the
                    // stop flag between slices.
                    loop {
                        if !self.running.load(Ordering::SeqCst) {
                            break;
                        }
                        let elapsed = tick_start.elapsed();
                        if elapsed >= interval {
                            break;
                        }
                        std::thread::sleep((interval - elapsed).min(STOP_POLL));
                    }
                }
                info!("Monitor scheduler stopped after {} ticks", self.tick_count);
            })?;

        Ok(MonitorHandle { running, handle })
    }
}

/// Stop handle for a spawned scheduler.
pub struct MonitorHandle {
    running: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl MonitorHandle {
    /// Signal the loop to stop and join the thread.
    pub fn stop(self) {
        self.running.store(false, Ordering::SeqCst);
        if self.handle.join().is_err() {
            warn!("Monitor thread panicked during shutdown");
        }
    }

    /// Shared stop flag, usable from signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}
