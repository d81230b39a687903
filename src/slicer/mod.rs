//! Slicing-engine command construction and execution
//!
//! Each supported engine vendor builds its own argument list, but all
//! vendors share one contract: paths are absolutized and normalized before
//! use, numeric parameters are rendered with fixed explicit formats, the
//! support flag and its auto companion are always emitted as a pair, and the
//! input model path comes last.

mod bambu;
mod process;
mod prusa;

pub use process::slice_model;
pub(crate) use process::run_with_timeout;

use crate::error::{Error, Result};
use crate::model::PrintParameters;
use std::path::Path;

/// Supported slicing-engine vendors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlicerVendor {
    /// PrusaSlicer
    Prusa,
    /// BambuStudio (shares PrusaSlicer's CLI vocabulary)
    Bambu,
}

impl SlicerVendor {
    /// All supported vendors
    pub const ALL: [SlicerVendor; 2] = [SlicerVendor::Prusa, SlicerVendor::Bambu];

    /// The configured identifier this vendor answers to
    pub fn name(&self) -> &'static str {
        match self {
            SlicerVendor::Prusa => "prusa",
            SlicerVendor::Bambu => "bambu",
        }
    }

    /// Select a vendor by its configured identifier, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownVendor`] enumerating the available vendor
    /// names when nothing matches.
    pub fn from_name(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(Error::UnknownVendor(
                "vendor name cannot be empty".to_string(),
            ));
        }
        Self::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let available = Self::ALL
                    .iter()
                    .map(|v| v.name())
                    .collect::<Vec<_>>()
                    .join(", ");
                Error::UnknownVendor(format!(
                    "no slicer found for type '{name}'. Available slicers: {available}"
                ))
            })
    }

    /// Build the full argument vector (program first) for one invocation
    pub fn command_line(
        &self,
        slicer_path: &Path,
        model_path: &Path,
        profile_path: &Path,
        output_path: &Path,
        params: &PrintParameters,
    ) -> Result<Vec<String>> {
        match self {
            SlicerVendor::Prusa => {
                prusa::command_line(slicer_path, model_path, profile_path, output_path, params)
            }
            SlicerVendor::Bambu => {
                bambu::command_line(slicer_path, model_path, profile_path, output_path, params)
            }
        }
    }
}

/// Absolutize and lexically normalize a path argument
///
/// Relative-path ambiguity is an injection vector when the engine resolves
/// arguments against its own working directory.
pub(crate) fn absolute_arg(path: &Path) -> Result<String> {
    let absolute = std::path::absolute(path)?;
    Ok(absolute.to_string_lossy().into_owned())
}

/// Layer height rendered with a fixed two-decimal format
pub(crate) fn layer_height_arg(layer_height: f64) -> String {
    format!("{layer_height:.2}")
}

/// The support flag and its auto companion, derived from one boolean
pub(crate) fn support_args(supports: bool) -> [String; 2] {
    let flag = if supports { "1" } else { "0" };
    [
        format!("--support-material={flag}"),
        format!("--support-material-auto={flag}"),
    ]
}
