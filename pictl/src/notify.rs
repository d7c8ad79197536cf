//! Log-backed notifier.
//!
//! Stands in for the chat transport when the console runs standalone:
//! every notification lands in the log under its own target so operators
//! can filter for it.

use pictl_common::traits::{Notifier, NotifyError};
use tracing::info;

/// Notifier that writes messages to the log. Never fails.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, text: &str) -> Result<(), NotifyError> {
        info!(target: "pictl::notify", "{text}");
        Ok(())
    }
}
