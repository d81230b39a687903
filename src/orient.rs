//! Model orientation adjustment
//!
//! Optional pre-processing that reorients a mesh for better print outcomes
//! by invoking an external tool as `tool <input> <output>`. This stage is a
//! best-effort optimization, not a correctness requirement: it never fails
//! the request. Every failure mode (stage disabled, flag unset, launch
//! failure, timeout, non-zero exit, missing output file) degrades to the
//! unmodified input path.

use crate::slicer::run_with_timeout;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Marker inserted before the extension of an oriented output file
pub const ORIENTED_MARKER: &str = "_oriented";

/// Best-effort mesh reorientation ahead of slicing
#[derive(Debug, Clone)]
pub struct OrientationAdjuster {
    enabled: bool,
    tool: PathBuf,
    timeout: Duration,
}

impl OrientationAdjuster {
    /// Create an adjuster
    ///
    /// `enabled` is the global switch; a request additionally opts in per
    /// call. `tool` is invoked as `tool <input> <output>`.
    pub fn new(enabled: bool, tool: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            enabled,
            tool: tool.into(),
            timeout,
        }
    }

    /// Reorient a model if both the global switch and the request flag allow
    ///
    /// Returns the path to slice plus whether adjustment happened. The
    /// returned path is the unmodified input on any failure; callers never
    /// need to handle an error from this stage.
    pub fn orient_if_requested(&self, input: &Path, requested: bool) -> (PathBuf, bool) {
        if !self.enabled || !requested {
            debug!(
                enabled = self.enabled,
                requested, "auto-orientation skipped"
            );
            return (input.to_path_buf(), false);
        }

        let output = oriented_path(input);
        let command = vec![
            self.tool.to_string_lossy().into_owned(),
            input.to_string_lossy().into_owned(),
            output.to_string_lossy().into_owned(),
        ];

        match run_with_timeout(&command, self.timeout) {
            Ok(Some((status, _))) if status.success() && output.exists() => {
                info!(path = %output.display(), "model auto-oriented");
                (output, true)
            }
            Ok(Some((status, captured))) => {
                warn!(
                    code = ?status.code(),
                    output = %captured.stdout.trim(),
                    "auto-orientation failed, using original model"
                );
                (input.to_path_buf(), false)
            }
            Ok(None) => {
                warn!("auto-orientation timed out, using original model");
                (input.to_path_buf(), false)
            }
            Err(err) => {
                warn!(%err, "auto-orientation could not run, using original model");
                (input.to_path_buf(), false)
            }
        }
    }

    /// Delete an oriented model file
    ///
    /// Refuses paths whose filename does not carry the oriented marker, so
    /// it can never delete another stage's artifact. Failures are logged and
    /// never escalate.
    pub fn cleanup(&self, path: &Path) {
        let owned = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.contains(ORIENTED_MARKER));
        if !owned {
            return;
        }
        if let Err(err) = fs::remove_file(path) {
            if path.exists() {
                warn!(path = %path.display(), %err, "could not delete oriented model");
            }
        }
    }

    /// Whether the stage is enabled and its tool exists
    pub fn is_available(&self) -> bool {
        self.enabled && self.tool.exists()
    }
}

/// Insert the oriented marker before the file extension
fn oriented_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("model");
    let name = match input.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}{ORIENTED_MARKER}.{ext}"),
        None => format!("{stem}{ORIENTED_MARKER}"),
    };
    input.with_file_name(name)
}
