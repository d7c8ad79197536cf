//! # pictl Console Binary
//!
//! Wires the device registry, the monitor scheduler and the collaborator
//! implementations together and runs until a shutdown signal arrives.
//! The chat transport itself is an external collaborator; this binary
//! ships a log-backed notifier so the core runs standalone.
//!
//! # Usage
//!
//! ```bash
//! # Probe real hardware, fall back to mock automatically
//! pictl --config /etc/pictl/config.toml
//!
//! # Force the simulated backend
//! pictl --simulate
//!
//! # Verbose logging, JSON output
//! pictl -v --json
//! ```

#![deny(warnings)]

mod notify;

use clap::Parser;
use notify::LogNotifier;
use pictl_common::config::{ConsoleConfig, LogLevel};
use pictl_common::store::MemoryStore;
use pictl_common::traits::{MetricsStore, Notifier};
use pictl_hal::{DeviceKind, DeviceRegistry, HalMode, SimBackend};
use pictl_monitor::{MonitorScheduler, SysinfoInspector};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// pictl - remote-control console for a single-board computer
#[derive(Parser, Debug)]
#[command(name = "pictl")]
#[command(version)]
#[command(about = "Device control and threshold monitoring console")]
#[command(long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "/etc/pictl/config.toml")]
    config: PathBuf,

    /// Force the simulated backend (skip the hardware probe)
    #[arg(short = 's', long)]
    simulate: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() {
    // run() can fail before the subscriber is installed, so report on
    // stderr directly.
    if let Err(e) = run() {
        eprintln!("pictl startup failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load the config before the subscriber so its log level can apply.
    let config = ConsoleConfig::load_or_default(&args.config)?;
    setup_tracing(&args, config.shared.log_level);

    info!("pictl v{} starting...", env!("CARGO_PKG_VERSION"));

    if !args.config.exists() {
        warn!(
            "Config file {} not found, using defaults",
            args.config.display()
        );
    }
    info!(
        "Config loaded: service '{}', interval {}s, {} device(s)",
        config.shared.service_name,
        config.monitor.interval_secs,
        config.devices.len()
    );

    // The mode decision happens exactly once, here.
    let registry = if args.simulate {
        info!("Simulation mode forced via CLI");
        Arc::new(DeviceRegistry::with_backend(
            Box::new(SimBackend::new()),
            HalMode::Mock,
        ))
    } else {
        Arc::new(DeviceRegistry::initialize())
    };

    for entry in &config.devices {
        let kind = if entry.pwm {
            DeviceKind::Pwm
        } else {
            DeviceKind::Binary
        };
        if registry.setup(entry.pin, &entry.name, kind).is_none() {
            warn!(
                "Device '{}' (pin {}) unavailable, continuing without it",
                entry.name, entry.pin
            );
        }
    }

    for info in registry.devices() {
        info!(
            "Device '{}': pin {} {:?} value {:.2}",
            info.name, info.pin, info.kind, info.value
        );
    }

    let notifier: Arc<dyn Notifier> = Arc::new(LogNotifier);
    let store: Arc<dyn MetricsStore> = Arc::new(MemoryStore::new());

    send_startup_notice(&config.shared.service_name, registry.mode(), &notifier);
    log_board_diagnostics(&registry);

    let scheduler = MonitorScheduler::new(
        Arc::clone(&registry),
        Box::new(SysinfoInspector::new()),
        Arc::clone(&notifier),
        Arc::clone(&store),
        &config.monitor,
    );
    let monitor = scheduler.spawn()?;

    let running = Arc::new(AtomicBool::new(true));
    let ctrlc_flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        ctrlc_flag.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
    }

    monitor.stop();
    info!("pictl shutdown complete");
    Ok(())
}

/// Tell the operator how the console came up. Delivery failure is
/// logged, never fatal.
fn send_startup_notice(service_name: &str, mode: HalMode, notifier: &Arc<dyn Notifier>) {
    let message = match mode {
        HalMode::Mock => format!("{service_name} started in MOCK mode (no hardware backend)"),
        HalMode::Real => format!("{service_name} online (hardware active)"),
    };
    if let Err(e) = notifier.send(&message) {
        error!("Startup notification failed: {e}");
    }
}

/// One diagnostics pass at boot so throttle history lands in the log.
fn log_board_diagnostics(registry: &DeviceRegistry) {
    let diag = registry.diagnostics();
    info!(
        "Board diagnostics: throttled={} volt_core={} clock_arm={}",
        diag.throttled.as_deref().unwrap_or("N/A"),
        diag.volt_core.as_deref().unwrap_or("N/A"),
        diag.clock_arm.as_deref().unwrap_or("N/A"),
    );
    if diag.throttle_warning() {
        warn!("Board reports a present or past under-voltage/throttle event");
    }
    for e in &diag.errors {
        warn!("Diagnostics: {e}");
    }
}

/// Setup tracing subscriber based on CLI arguments.
///
/// `--verbose` wins; otherwise the configured log level applies.
fn setup_tracing(args: &Args, config_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config_level.as_tracing_level()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
