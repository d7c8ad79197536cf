//! pictl Common Library
//!
//! Shared building blocks for all pictl workspace crates:
//!
//! - [`config`] - TOML configuration loading and validation
//! - [`metrics`] - Metric kinds, samples and sensor readings
//! - [`traits`] - Contracts for external collaborators (notifier,
//!   metrics store, OS resource inspector)
//! - [`store`] - In-process metrics store with rolling retention

pub mod config;
pub mod metrics;
pub mod store;
pub mod traits;
