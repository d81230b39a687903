//! Dynamic profile generation
//!
//! A dynamic profile is a full copy of a base profile with selected keys
//! replaced from the request parameters. Comments and blank lines are
//! preserved verbatim by position so the generated file diffs cleanly
//! against its base. Generated files carry a timestamp/counter-derived name
//! and the cleanup routine refuses to delete anything else.

use crate::error::Result;
use crate::model::PrintParameters;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Filename prefix owned by this generator's cleanup
const DYNAMIC_PREFIX: &str = "dynamic_config_";

/// Process-wide sequence making generated names collision-free under
/// concurrent requests sharing a millisecond
static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One line of a profile file, preserved by position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLine {
    /// An empty line
    Blank,
    /// A `#` or `;` comment, stored verbatim
    Comment(String),
    /// A `key = value` pair
    Pair {
        /// The key, trimmed
        key: String,
        /// The value, trimmed
        value: String,
    },
}

/// Load a profile file preserving line structure
///
/// Lines that are neither blank, comment, nor `key = value` are dropped,
/// matching how the slicers themselves read these files.
pub fn load_profile(path: &Path) -> Result<Vec<ProfileLine>> {
    let content = fs::read_to_string(path)?;
    let mut lines = Vec::new();
    for raw in content.lines() {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            lines.push(ProfileLine::Blank);
        } else if trimmed.starts_with('#') || trimmed.starts_with(';') {
            lines.push(ProfileLine::Comment(raw.to_string()));
        } else if let Some((key, value)) = raw.split_once('=') {
            lines.push(ProfileLine::Pair {
                key: key.trim().to_string(),
                value: value.trim().to_string(),
            });
        }
    }
    Ok(lines)
}

/// Replace the first pair with `key`, or append a new pair
fn set_key(lines: &mut Vec<ProfileLine>, key: &str, new_value: impl Into<String>) {
    let new_value = new_value.into();
    for line in lines.iter_mut() {
        if let ProfileLine::Pair { key: k, value } = line {
            if k == key {
                *value = new_value;
                return;
            }
        }
    }
    lines.push(ProfileLine::Pair {
        key: key.to_string(),
        value: new_value,
    });
}

/// Apply the request's values over the loaded base lines
fn apply_parameters(lines: &mut Vec<ProfileLine>, params: &PrintParameters) {
    set_key(lines, "layer_height", format!("{}", params.layer_height));
    set_key(lines, "perimeters", params.shells.to_string());
    set_key(lines, "fill_density", format!("{}%", params.infill));

    if let Some(top) = params.top_shell_layers {
        set_key(lines, "top_solid_layers", top.to_string());
    }
    if let Some(bottom) = params.bottom_shell_layers {
        set_key(lines, "bottom_solid_layers", bottom.to_string());
    }
    if let Some(pattern) = params.infill_pattern {
        set_key(lines, "fill_pattern", pattern.as_str());
    }
    if let Some(style) = params.brim_style {
        set_key(lines, "brim_type", style.as_str());
    }
    if let Some(width) = params.brim_width {
        set_key(lines, "brim_width", width.to_string());
    }

    // The support flag and its auto companion are always written as a pair
    // from the single boolean, so neither can go stale against the other.
    let flag = if params.supports { "1" } else { "0" };
    set_key(lines, "support_material", flag);
    set_key(lines, "support_material_auto", flag);
    if params.supports {
        set_key(lines, "support_material_pattern", "tree");
    }

    if let Some(seam) = params.seam {
        set_key(lines, "seam_position", seam.as_str());
    }
    if !params.color_change_layers.is_empty() {
        let layers = params
            .color_change_layers
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        set_key(lines, "color_change_gcode", layers);
    }
}

/// Generates and cleans up dynamic profile files in a temp directory
#[derive(Debug, Clone)]
pub struct DynamicProfileGenerator {
    temp_dir: PathBuf,
}

impl DynamicProfileGenerator {
    /// Create a generator writing into the given temp directory
    pub fn new(temp_dir: impl Into<PathBuf>) -> Self {
        Self {
            temp_dir: temp_dir.into(),
        }
    }

    /// Generate a dynamic profile from a base file and the request values
    ///
    /// Returns the path of the generated file. The caller owns passing it
    /// back to [`DynamicProfileGenerator::cleanup`] when the slicing stage
    /// is done with it.
    pub fn generate(&self, base: &Path, params: &PrintParameters) -> Result<PathBuf> {
        let mut lines = load_profile(base)?;
        apply_parameters(&mut lines, params);

        fs::create_dir_all(&self.temp_dir)?;
        let path = self.temp_dir.join(next_profile_name());

        let mut file = fs::File::create(&path)?;
        for line in &lines {
            match line {
                ProfileLine::Blank => writeln!(file)?,
                ProfileLine::Comment(text) => writeln!(file, "{text}")?,
                ProfileLine::Pair { key, value } => writeln!(file, "{key} = {value}")?,
            }
        }

        debug!(path = %path.display(), base = %base.display(), "generated dynamic profile");
        Ok(path)
    }

    /// Delete a generated profile
    ///
    /// Refuses paths whose filename does not carry this generator's prefix,
    /// so it can never delete another stage's artifact. Failures are logged
    /// and never escalate.
    pub fn cleanup(&self, path: &Path) {
        let owned = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with(DYNAMIC_PREFIX));
        if !owned {
            return;
        }
        if let Err(err) = fs::remove_file(path) {
            if path.exists() {
                warn!(path = %path.display(), %err, "could not delete dynamic profile");
            }
        }
    }
}

/// Timestamp- and counter-derived name for a generated profile
fn next_profile_name() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{DYNAMIC_PREFIX}{millis}_{seq}.ini")
}
