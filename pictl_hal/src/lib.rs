//! pictl Hardware Abstraction Layer
//!
//! Sits directly under the remote-control surface, so every public
//! operation here is total: hardware faults become logged no-ops,
//! sentinel values or structured partial results, never panics or
//! errors that could take down the command loop.
//!
//! # Module Structure
//!
//! - [`device`] - Output and sensor capability traits, tagged device slots
//! - [`backend`] - Backend trait, operating mode, real-backend probe
//! - [`sim`] - Simulated backend (no physical I/O)
//! - [`gpio`] - Real GPIO backend via `rppal` (feature `gpio`)
//! - [`registry`] - The device registry, single source of truth for devices
//! - [`diag`] - Board diagnostics via `vcgencmd`
//! - [`error`] - HAL error taxonomy

pub mod backend;
pub mod device;
pub mod diag;
pub mod error;
#[cfg(feature = "gpio")]
pub mod gpio;
pub mod registry;
pub mod sim;

pub use backend::{HalBackend, HalMode};
pub use device::{Device, DeviceInfo, DeviceKind};
pub use diag::BoardDiagnostics;
pub use error::HalError;
pub use registry::DeviceRegistry;
pub use sim::SimBackend;
