//! Board diagnostics via the vendor `vcgencmd` utility.
//!
//! Three key=value queries: throttle flags, core voltage, ARM clock.
//! Each query is isolated — a failure in one never aborts the others —
//! and carries an explicit timeout so a wedged utility cannot stall a
//! scheduler tick. Failed queries are listed in `errors` alongside the
//! partial results.

use crate::backend::HalMode;
use crate::error::HalError;
use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Upper bound for one vendor query, spawn to exit.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Poll interval while waiting on a child process.
const WAIT_POLL: Duration = Duration::from_millis(50);

/// Power/clock/throttle status, possibly partial.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BoardDiagnostics {
    /// Raw throttle flags (e.g., "0x0", "0x50005"), verbatim.
    pub throttled: Option<String>,
    /// Core voltage (e.g., "1.2000V").
    pub volt_core: Option<String>,
    /// ARM clock frequency in Hz.
    pub clock_arm: Option<String>,
    /// Names and reasons of failed queries.
    pub errors: Vec<String>,
}

impl BoardDiagnostics {
    /// Fixed values reported in mock mode. Never invokes a process.
    pub fn mock() -> Self {
        Self {
            throttled: Some("0x0 (Mock)".to_string()),
            volt_core: Some("1.2000V (Mock)".to_string()),
            clock_arm: Some("1500000000 (Mock)".to_string()),
            errors: Vec::new(),
        }
    }

    /// True when the throttle flag indicates a real or historical
    /// under-voltage/throttle event.
    ///
    /// Only the leading token is compared so labeled mock values stay
    /// nominal; the flag value itself is passed through verbatim, not
    /// decoded bit-by-bit.
    pub fn throttle_warning(&self) -> bool {
        match &self.throttled {
            Some(raw) => raw.split_whitespace().next() != Some("0x0"),
            None => false,
        }
    }

    /// True when all three queries produced a value.
    pub fn is_complete(&self) -> bool {
        self.throttled.is_some() && self.volt_core.is_some() && self.clock_arm.is_some()
    }
}

/// Collect diagnostics for the given mode.
pub(crate) fn collect(mode: HalMode) -> BoardDiagnostics {
    if mode == HalMode::Mock {
        return BoardDiagnostics::mock();
    }

    let throttled = query("throttled", &["get_throttled"]);
    let volt_core = query("volt_core", &["measure_volts", "core"]);
    let clock_arm = query("clock_arm", &["measure_clock", "arm"]);
    assemble(throttled, volt_core, clock_arm)
}

/// Fold three independent query results into a partial map.
fn assemble(
    throttled: Result<String, HalError>,
    volt_core: Result<String, HalError>,
    clock_arm: Result<String, HalError>,
) -> BoardDiagnostics {
    let mut diag = BoardDiagnostics::default();
    diag.throttled = unwrap_query(throttled, &mut diag.errors);
    diag.volt_core = unwrap_query(volt_core, &mut diag.errors);
    diag.clock_arm = unwrap_query(clock_arm, &mut diag.errors);
    diag
}

/// Keep the value on success; log and record the failure otherwise.
fn unwrap_query(result: Result<String, HalError>, errors: &mut Vec<String>) -> Option<String> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("{e}");
            errors.push(e.to_string());
            None
        }
    }
}

/// Run one vcgencmd query and extract the value after '='.
fn query(name: &'static str, args: &[&str]) -> Result<String, HalError> {
    let output = run_with_timeout(name, "vcgencmd", args, QUERY_TIMEOUT)?;
    parse_value(name, &output)
}

/// Extract the value part of a `key=value` line.
fn parse_value(name: &'static str, raw: &str) -> Result<String, HalError> {
    raw.trim()
        .split_once('=')
        .map(|(_, value)| value.to_string())
        .ok_or_else(|| HalError::DiagnosticQueryFailure {
            query: name,
            reason: format!("unexpected output: {raw:?}"),
        })
}

/// Run a command, polling for exit until the deadline, then kill.
fn run_with_timeout(
    name: &'static str,
    program: &str,
    args: &[&str],
    timeout: Duration,
) -> Result<String, HalError> {
    let fail = |reason: String| HalError::DiagnosticQueryFailure {
        query: name,
        reason,
    };

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| fail(e.to_string()))?;

    // Drain stdout on a separate thread while polling for exit. Reading
    // only after exit would deadlock on any output larger than the pipe
    // buffer and surface as a bogus timeout.
    let reader = child.stdout.take().map(|mut stdout| {
        std::thread::spawn(move || {
            let mut buf = String::new();
            stdout.read_to_string(&mut buf).map(|_| buf)
        })
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(fail(format!("timed out after {timeout:?}")));
                }
                std::thread::sleep(WAIT_POLL);
            }
            Err(e) => return Err(fail(e.to_string())),
        }
    };

    if !status.success() {
        return Err(fail(format!("exited with {status}")));
    }

    let output = match reader {
        Some(handle) => handle
            .join()
            .map_err(|_| fail("stdout reader panicked".to_string()))?
            .map_err(|e| fail(e.to_string()))?,
        None => String::new(),
    };
    debug!("vcgencmd {args:?} -> {}", output.trim());
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_err(name: &'static str) -> HalError {
        HalError::DiagnosticQueryFailure {
            query: name,
            reason: "boom".to_string(),
        }
    }

    #[test]
    fn mock_values_are_labeled_and_complete() {
        let diag = BoardDiagnostics::mock();
        assert!(diag.is_complete());
        assert!(diag.errors.is_empty());
        assert!(diag.throttled.as_deref().unwrap().contains("(Mock)"));
        assert!(diag.volt_core.as_deref().unwrap().contains("(Mock)"));
        assert!(diag.clock_arm.as_deref().unwrap().contains("(Mock)"));
    }

    #[test]
    fn mock_throttle_flag_is_nominal() {
        assert!(!BoardDiagnostics::mock().throttle_warning());
    }

    #[test]
    fn nonzero_throttle_flag_warns() {
        let diag = BoardDiagnostics {
            throttled: Some("0x50005".to_string()),
            ..Default::default()
        };
        assert!(diag.throttle_warning());
    }

    #[test]
    fn missing_throttle_flag_does_not_warn() {
        assert!(!BoardDiagnostics::default().throttle_warning());
    }

    #[test]
    fn parse_value_splits_on_equals() {
        assert_eq!(
            parse_value("throttled", "throttled=0x50005\n").unwrap(),
            "0x50005"
        );
        assert_eq!(
            parse_value("volt_core", "volt=1.2000V").unwrap(),
            "1.2000V"
        );
        assert!(parse_value("throttled", "garbage").is_err());
    }

    #[test]
    fn assemble_keeps_partial_results() {
        let diag = assemble(
            Err(query_err("throttled")),
            Ok("1.2000V".to_string()),
            Ok("1500000000".to_string()),
        );
        assert_eq!(diag.throttled, None);
        assert_eq!(diag.volt_core.as_deref(), Some("1.2000V"));
        assert_eq!(diag.clock_arm.as_deref(), Some("1500000000"));
        assert_eq!(diag.errors.len(), 1);
        assert!(diag.errors[0].contains("throttled"));
        assert!(!diag.is_complete());
    }

    #[test]
    fn assemble_isolates_every_failure() {
        let diag = assemble(
            Err(query_err("throttled")),
            Err(query_err("volt_core")),
            Err(query_err("clock_arm")),
        );
        assert!(!diag.is_complete());
        assert_eq!(diag.errors.len(), 3);
    }

    #[test]
    fn run_with_timeout_kills_wedged_command() {
        let result = run_with_timeout(
            "throttled",
            "sleep",
            &["30"],
            Duration::from_millis(200),
        );
        assert!(matches!(
            result,
            Err(HalError::DiagnosticQueryFailure { .. })
        ));
    }

    #[test]
    fn run_with_timeout_drains_output_larger_than_a_pipe_buffer() {
        // 1 MiB is far beyond any pipe buffer; a child this chatty must
        // still exit within the deadline.
        let output = run_with_timeout(
            "throttled",
            "sh",
            &["-c", "head -c 1048576 /dev/zero | tr '\\0' 'a'"],
            QUERY_TIMEOUT,
        )
        .unwrap();
        assert_eq!(output.len(), 1_048_576);
    }

    #[test]
    fn run_with_timeout_captures_output() {
        let output =
            run_with_timeout("throttled", "echo", &["throttled=0x0"], QUERY_TIMEOUT).unwrap();
        assert_eq!(output.trim(), "throttled=0x0");
    }
}
