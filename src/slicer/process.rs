//! External-process orchestration
//!
//! Executes a prepared slicer command with a wall-clock bound. Both output
//! streams are drained on dedicated threads concurrently with the wait;
//! an engine that fills an OS pipe buffer would otherwise deadlock against
//! a sequential reader. Termination on timeout is forceful; the engines are
//! not assumed to honor graceful shutdown.
//!
//! Before anything is spawned, every path argument passes a safety gate
//! rejecting traversal sequences and shell metacharacters, and the numeric
//! parameters are bounds-checked.

use crate::error::{Error, Result};
use crate::model::PrintParameters;
use crate::output::{self, SlicingOutcome};
use crate::slicer::SlicerVendor;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Shell metacharacters rejected in path arguments
const DANGEROUS_CHARS: [char; 7] = [';', '&', '|', '$', '`', '\n', '\r'];

/// Poll interval while waiting on the child process
const WAIT_POLL: Duration = Duration::from_millis(50);

// Accepted parameter ranges; values outside never reach a command line.
const LAYER_HEIGHT_RANGE: (f64, f64) = (0.05, 0.4);
const SHELLS_RANGE: (f64, f64) = (1.0, 5.0);
const INFILL_RANGE: (f64, f64) = (5.0, 20.0);

/// Captured output streams of a finished process
#[derive(Debug, Default)]
pub(crate) struct CapturedOutput {
    /// Everything the process wrote to stdout
    pub stdout: String,
    /// Everything the process wrote to stderr
    pub stderr: String,
}

/// Run a prepared slicer invocation and parse its output
///
/// The engine's output file is best-effort deleted after parsing on every
/// path; a deletion failure is logged and never masks the primary result.
///
/// # Errors
///
/// - [`Error::SecurityViolation`] when a path argument fails the safety gate
/// - [`Error::InvalidParameter`] for out-of-range numeric parameters
/// - [`Error::SlicingTimeout`] when the wall-clock bound is exceeded
/// - [`Error::Slicing`] for launch failures and non-zero exits (carrying
///   captured stderr)
pub fn slice_model(
    vendor: SlicerVendor,
    slicer_path: &Path,
    model_path: &Path,
    profile_path: &Path,
    output_path: &Path,
    params: &PrintParameters,
    timeout: Duration,
) -> Result<SlicingOutcome> {
    check_path_safety(model_path, "model file")?;
    check_path_safety(profile_path, "configuration file")?;
    check_path_safety(output_path, "output file")?;
    check_path_readable(model_path, "model file")?;
    check_path_readable(profile_path, "configuration file")?;
    validate_parameters(params)?;

    let command = vendor.command_line(slicer_path, model_path, profile_path, output_path, params)?;
    info!(vendor = vendor.name(), command = %command.join(" "), "executing slicer");

    let result = run_and_parse(&command, output_path, timeout);

    if let Err(err) = fs::remove_file(output_path) {
        if output_path.exists() {
            warn!(path = %output_path.display(), %err, "could not delete engine output file");
        }
    }

    result
}

fn run_and_parse(
    command: &[String],
    output_path: &Path,
    timeout: Duration,
) -> Result<SlicingOutcome> {
    let program = command.first().map(String::as_str).unwrap_or("<engine>");
    let waited = run_with_timeout(command, timeout)
        .map_err(|err| Error::Slicing(format!("failed to launch '{program}': {err}")))?;

    let Some((status, captured)) = waited else {
        return Err(Error::SlicingTimeout(timeout.as_secs()));
    };

    debug!(code = ?status.code(), "slicer finished");

    if !status.success() {
        let diagnostic = if captured.stderr.trim().is_empty() {
            format!("engine exited with {status}")
        } else {
            captured.stderr.trim().to_string()
        };
        return Err(Error::Slicing(diagnostic));
    }

    output::parse_slicer_output(&captured.stdout, output_path)
}

/// Spawn a command and wait for it with a wall-clock bound
///
/// Returns `Ok(None)` when the bound was exceeded; the child has been
/// forcibly killed and reaped. Both streams are drained concurrently with
/// the wait.
pub(crate) fn run_with_timeout(
    command: &[String],
    timeout: Duration,
) -> std::io::Result<Option<(ExitStatus, CapturedOutput)>> {
    let (program, args) = command
        .split_first()
        .ok_or_else(|| std::io::Error::other("empty command line"))?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let stdout_reader = child.stdout.take().map(spawn_drain);
    let stderr_reader = child.stderr.take().map(spawn_drain);

    let deadline = Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            drain_join(stdout_reader);
            drain_join(stderr_reader);
            return Ok(None);
        }
        thread::sleep(WAIT_POLL);
    };

    let captured = CapturedOutput {
        stdout: drain_join(stdout_reader),
        stderr: drain_join(stderr_reader),
    };
    Ok(Some((status, captured)))
}

fn spawn_drain<R: Read + Send + 'static>(mut stream: R) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buffer = String::new();
        let _ = stream.read_to_string(&mut buffer);
        buffer
    })
}

fn drain_join(handle: Option<thread::JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Reject traversal sequences and shell metacharacters in a path argument
pub(crate) fn check_path_safety(path: &Path, description: &str) -> Result<()> {
    let text = path.to_string_lossy();

    if text.contains("..") {
        return Err(Error::SecurityViolation(format!(
            "path traversal detected in {description}: {text}"
        )));
    }
    if let Some(bad) = text.chars().find(|c| DANGEROUS_CHARS.contains(c)) {
        return Err(Error::SecurityViolation(format!(
            "dangerous character {bad:?} detected in {description}: {text}"
        )));
    }
    Ok(())
}

fn check_path_readable(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(Error::InvalidParameter(format!(
            "{description} does not exist: {}",
            path.display()
        )));
    }
    if fs::File::open(path).is_err() {
        return Err(Error::InvalidParameter(format!(
            "{description} is not readable: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Bounds-check the numeric parameters that end up in command arguments
fn validate_parameters(params: &PrintParameters) -> Result<()> {
    check_range("layer height", params.layer_height, LAYER_HEIGHT_RANGE)?;
    check_range("shells", f64::from(params.shells), SHELLS_RANGE)?;
    check_range("infill", f64::from(params.infill), INFILL_RANGE)?;
    Ok(())
}

fn check_range(name: &str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if !value.is_finite() {
        return Err(Error::InvalidParameter(format!(
            "{name} must be a valid number"
        )));
    }
    if value < min || value > max {
        return Err(Error::parameter_out_of_range(name, min, max, value));
    }
    Ok(())
}
