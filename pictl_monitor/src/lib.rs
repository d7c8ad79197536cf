//! pictl Monitor
//!
//! Background threshold alerting for the console. A fixed-interval
//! scheduler samples the OS inspector and the HAL, feeds each reading
//! through the stateless alert engine, and pushes breach notifications
//! through the external notifier. The loop is the availability backbone
//! of the monitoring feature: no fault in a single metric, the store or
//! the notifier may terminate it.
//!
//! # Module Structure
//!
//! - [`alert`] - Stateless threshold evaluation and alert formatting
//! - [`scheduler`] - The periodic background task and its stop handle
//! - [`inspector`] - `sysinfo`-backed OS resource inspector

pub mod alert;
pub mod inspector;
pub mod scheduler;

pub use alert::{AlertSample, Verdict, alert_message, evaluate};
pub use inspector::SysinfoInspector;
pub use scheduler::{MonitorHandle, MonitorScheduler};
