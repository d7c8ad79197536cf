//! Monitor scheduler tick tests.
//!
//! Drives `run_once()` directly with scripted collaborators: a scripted
//! inspector, a recording notifier and the in-memory store. Covers the
//! alert sequence property, per-metric fault isolation, alert
//! re-emission without cool-down, and sample recording.

use parking_lot::Mutex;
use pictl_common::config::MonitorConfig;
use pictl_common::metrics::SensorReading;
use pictl_common::store::MemoryStore;
use pictl_common::traits::{
    InspectError, MetricsStore, Notifier, NotifyError, ResourceInspector,
};
use pictl_hal::sim::SimBackend;
use pictl_hal::{DeviceRegistry, HalMode};
use pictl_monitor::MonitorScheduler;
use std::collections::VecDeque;
use std::sync::Arc;

// ─── Scripted collaborators ─────────────────────────────────────────

/// Notifier that records every delivered message.
#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.messages.lock().push(text.to_string());
        Ok(())
    }
}

/// Notifier that always fails delivery.
struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn send(&self, _text: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("offline".to_string()))
    }
}

/// Inspector with a scripted CPU sequence and fixed other readings.
struct ScriptedInspector {
    cpu_script: VecDeque<Result<f64, InspectError>>,
    disk: Result<f64, InspectError>,
    ram: f64,
    sensors: Vec<SensorReading>,
}

impl ScriptedInspector {
    fn with_cpu(values: &[f64]) -> Self {
        Self {
            cpu_script: values.iter().map(|v| Ok(*v)).collect(),
            disk: Ok(40.0),
            ram: 35.0,
            sensors: Vec::new(),
        }
    }

    fn failing_cpu() -> Self {
        Self {
            cpu_script: VecDeque::new(),
            disk: Ok(40.0),
            ram: 35.0,
            sensors: Vec::new(),
        }
    }
}

impl ResourceInspector for ScriptedInspector {
    fn cpu_percent(&mut self) -> Result<f64, InspectError> {
        self.cpu_script
            .pop_front()
            .unwrap_or(Err(InspectError::Unavailable {
                metric: "cpu",
                reason: "script exhausted".to_string(),
            }))
    }

    fn ram_percent(&mut self) -> Result<f64, InspectError> {
        Ok(self.ram)
    }

    fn disk_percent(&mut self) -> Result<f64, InspectError> {
        self.disk.clone()
    }

    fn temperatures(&mut self) -> Result<Vec<SensorReading>, InspectError> {
        Ok(self.sensors.clone())
    }
}

// ─── Harness ────────────────────────────────────────────────────────

struct Harness {
    scheduler: MonitorScheduler,
    notifier: Arc<RecordingNotifier>,
    store: Arc<MemoryStore>,
}

fn harness(inspector: ScriptedInspector) -> Harness {
    // Cold simulated board so temperature never interferes with the
    // CPU/disk assertions.
    let backend = SimBackend::with_temperature(45.0, (-2.0, 5.0), Some(99));
    let registry = Arc::new(DeviceRegistry::with_backend(
        Box::new(backend),
        HalMode::Mock,
    ));
    let notifier = Arc::new(RecordingNotifier::default());
    let store = Arc::new(MemoryStore::new());
    let scheduler = MonitorScheduler::new(
        registry,
        Box::new(inspector),
        Arc::clone(&notifier) as Arc<dyn Notifier>,
        Arc::clone(&store) as Arc<dyn MetricsStore>,
        &MonitorConfig::default(),
    );
    Harness {
        scheduler,
        notifier,
        store,
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[test]
fn cpu_alerts_fire_only_on_breaching_ticks() {
    // cpu_percent = 90; samples [85, 92, 91, 80] alert on ticks 2 and 3.
    let mut h = harness(ScriptedInspector::with_cpu(&[85.0, 92.0, 91.0, 80.0]));

    let mut alerts_per_tick = Vec::new();
    for _ in 0..4 {
        h.scheduler.run_once();
        let cpu_alerts = h
            .notifier
            .messages()
            .iter()
            .filter(|m| m.contains("CPU"))
            .count();
        alerts_per_tick.push(cpu_alerts);
    }
    assert_eq!(alerts_per_tick, vec![0, 1, 2, 2]);
}

#[test]
fn persistent_breach_realerts_every_tick() {
    // No cool-down: a metric stuck above threshold alerts on every tick.
    let mut h = harness(ScriptedInspector::with_cpu(&[95.0, 95.0, 95.0]));
    for _ in 0..3 {
        h.scheduler.run_once();
    }
    let cpu_alerts = h
        .notifier
        .messages()
        .iter()
        .filter(|m| m.contains("CPU"))
        .count();
    assert_eq!(cpu_alerts, 3);
}

#[test]
fn failing_collector_does_not_stop_other_metrics() {
    let mut inspector = ScriptedInspector::failing_cpu();
    inspector.disk = Ok(95.0); // above the default 90 ceiling
    inspector.sensors = vec![SensorReading {
        label: "nvme0".to_string(),
        celsius: 85.0, // above the default 80 ceiling
    }];
    let mut h = harness(inspector);

    h.scheduler.run_once();

    let messages = h.notifier.messages();
    assert!(messages.iter().any(|m| m.contains("Disk")), "{messages:?}");
    assert!(
        messages.iter().any(|m| m.contains("nvme0")),
        "{messages:?}"
    );
    // Failed metric is recorded as 0.0, the tick itself survives.
    let samples = h.store.recent(1).unwrap();
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].cpu_percent, 0.0);
    assert_eq!(samples[0].disk_percent, 95.0);
}

#[test]
fn every_breaching_sensor_alerts_independently() {
    let mut inspector = ScriptedInspector::with_cpu(&[10.0]);
    inspector.sensors = vec![
        SensorReading {
            label: "soc".to_string(),
            celsius: 88.0,
        },
        SensorReading {
            label: "nvme0".to_string(),
            celsius: 91.0,
        },
        SensorReading {
            label: "ambient".to_string(),
            celsius: 30.0,
        },
    ];
    let mut h = harness(inspector);

    h.scheduler.run_once();

    let messages = h.notifier.messages();
    assert!(messages.iter().any(|m| m.contains("soc")));
    assert!(messages.iter().any(|m| m.contains("nvme0")));
    assert!(!messages.iter().any(|m| m.contains("ambient")));
}

#[test]
fn notifier_failure_never_kills_the_tick() {
    let backend = SimBackend::with_temperature(45.0, (-2.0, 5.0), Some(7));
    let registry = Arc::new(DeviceRegistry::with_backend(
        Box::new(backend),
        HalMode::Mock,
    ));
    let store = Arc::new(MemoryStore::new());
    let mut scheduler = MonitorScheduler::new(
        registry,
        Box::new(ScriptedInspector::with_cpu(&[99.0, 99.0])),
        Arc::new(FailingNotifier),
        Arc::clone(&store) as Arc<dyn MetricsStore>,
        &MonitorConfig::default(),
    );

    scheduler.run_once();
    scheduler.run_once();

    // Both ticks completed and recorded despite delivery failures.
    assert_eq!(store.recent(1).unwrap().len(), 2);
}

#[test]
fn every_tick_records_one_sample() {
    let mut h = harness(ScriptedInspector::with_cpu(&[10.0, 20.0, 30.0]));
    for _ in 0..3 {
        h.scheduler.run_once();
    }
    let samples = h.store.recent(1).unwrap();
    assert_eq!(samples.len(), 3);
    assert!(samples[0].temp_celsius >= 43.0 && samples[0].temp_celsius <= 50.0);
    assert_eq!(samples[2].disk_percent, 40.0);
    assert_eq!(samples[2].ram_percent, 35.0);
}

#[test]
fn spawned_scheduler_stops_on_request() {
    let h = harness(ScriptedInspector::with_cpu(&[10.0; 8]));
    let handle = h
        .scheduler
        .with_interval(std::time::Duration::from_millis(50))
        .spawn()
        .expect("spawn");

    std::thread::sleep(std::time::Duration::from_millis(120));
    handle.stop();

    // At least the initial tick ran and samples were recorded.
    assert!(!h.store.is_empty());
}
