//! Package parameter extraction
//!
//! 3MF packages are ZIP archives. Slicer settings live in metadata entries:
//!
//! - `Metadata/Slic3r_PE.config` (print settings)
//! - `Metadata/Slic3r_PE_model.config` (per-model settings)
//! - `Metadata/PrusaSlicer.config`
//!
//! Every recognized entry is parsed in archive order into one key/value map,
//! so on key collisions the entry parsed last wins. The model-level entry is
//! written after the print-level one and reflects what will actually print.
//!
//! Entry count and declared entry size are capped before any entry content
//! is parsed, as a defense against archive bombs.

use crate::error::{Error, Result};
use crate::model::{BrimStyle, InfillPattern, PrintParameters, SeamPosition};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Hard cap on the number of archive entries
pub const MAX_ARCHIVE_ENTRIES: usize = 1000;

/// Hard cap on a single entry's declared uncompressed size (200 MiB)
pub const MAX_ENTRY_SIZE: u64 = 200 * 1024 * 1024;

/// Recognized metadata entry paths, in priority order
const CONFIG_ENTRY_PATHS: &[&str] = &[
    "Metadata/Slic3r_PE.config",
    "Metadata/Slic3r_PE_model.config",
    "Metadata/PrusaSlicer.config",
];

// Defaults for fields the package does not carry or fails to coerce
const DEFAULT_TECHNOLOGY: &str = "FDM";
const DEFAULT_MATERIAL: &str = "PLA";
const DEFAULT_LAYER_HEIGHT: f64 = 0.2;
const DEFAULT_SHELLS: u32 = 2;
const DEFAULT_INFILL: u32 = 15;
const DEFAULT_SUPPORTS: bool = false;
const DEFAULT_TOP_SHELL_LAYERS: u32 = 5;
const DEFAULT_BOTTOM_SHELL_LAYERS: u32 = 3;
const DEFAULT_INFILL_PATTERN: InfillPattern = InfillPattern::Grid;
const DEFAULT_BRIM_STYLE: BrimStyle = BrimStyle::Auto;

/// Extract print parameters from a saved package file
///
/// Supplied request parameters are ignored for this format; extraction fully
/// overrides them field-by-field, falling back to fixed defaults only where
/// the package lacks a value.
pub(super) fn extract(model_path: &Path) -> Result<PrintParameters> {
    let config = read_archive_config(model_path)?;

    if config.is_empty() {
        warn!(path = %model_path.display(), "no slicer config found in package, using defaults");
    } else {
        debug!(entries = config.len(), "package config entries extracted");
    }

    Ok(parameters_from(&config))
}

/// Scan the archive for recognized metadata entries and merge their pairs
fn read_archive_config(model_path: &Path) -> Result<HashMap<String, String>> {
    let file = File::open(model_path)?;
    let mut archive = ZipArchive::new(file)?;

    if archive.len() > MAX_ARCHIVE_ENTRIES {
        return Err(Error::file_parse_context(
            "package archive",
            &format!("too many entries (max: {MAX_ARCHIVE_ENTRIES})"),
        ));
    }

    let mut config = HashMap::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;

        if entry.size() > MAX_ENTRY_SIZE {
            return Err(Error::file_parse_context(
                "package archive",
                &format!("entry too large: {}", entry.name()),
            ));
        }

        if CONFIG_ENTRY_PATHS.contains(&entry.name()) {
            debug!(entry = entry.name(), "reading slicer config entry");
            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            parse_config_entry(&content, &mut config);
        }
    }

    Ok(config)
}

/// Parse `key = value` lines into the map
///
/// Blank lines and `#`/`;` comments are skipped; surrounding double quotes
/// are stripped from values.
fn parse_config_entry(content: &str, config: &mut HashMap<String, String>) {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let mut value = value.trim();
        if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            value = &value[1..value.len() - 1];
        }
        config.insert(key.to_string(), value.to_string());
    }
}

/// Build the parameter set from extracted pairs, defaulting per field
fn parameters_from(config: &HashMap<String, String>) -> PrintParameters {
    let technology = config
        .get("printer_technology")
        .cloned()
        .unwrap_or_else(|| DEFAULT_TECHNOLOGY.to_string());

    let mut params = PrintParameters::new(
        technology,
        extract_material(config),
        coerce_f64(config, "layer_height", DEFAULT_LAYER_HEIGHT),
        coerce_u32(config, "perimeters", DEFAULT_SHELLS),
        extract_infill_percentage(config),
        coerce_bool(config, "support_material", DEFAULT_SUPPORTS),
    );

    params.top_shell_layers = Some(coerce_u32(
        config,
        "top_solid_layers",
        DEFAULT_TOP_SHELL_LAYERS,
    ));
    params.bottom_shell_layers = Some(coerce_u32(
        config,
        "bottom_solid_layers",
        DEFAULT_BOTTOM_SHELL_LAYERS,
    ));
    params.infill_pattern = Some(extract_infill_pattern(config));
    params.brim_style = Some(extract_brim_style(config));
    params.brim_width = config
        .get("brim_width")
        .and_then(|v| coerce_value::<u32>("brim_width", v));
    params.seam = config
        .get("seam_position")
        .and_then(|v| match SeamPosition::from_value(v) {
            some @ Some(_) => some,
            None => {
                warn!(value = %v, "unknown seam position, skipping");
                None
            }
        });
    // Packages already encode orientation; never reorient them.
    params.auto_orient = false;

    params
}

/// Material lookup with synonym folding
///
/// `filament_type` is preferred, then `material`. Names are uppercased and
/// known synonyms folded to canonical values ("PET" is PETG).
fn extract_material(config: &HashMap<String, String>) -> String {
    let material = config
        .get("filament_type")
        .or_else(|| config.get("material"))
        .map(String::as_str)
        .unwrap_or(DEFAULT_MATERIAL);

    let material = material.to_uppercase();
    match material.as_str() {
        "PET" => "PETG".to_string(),
        _ => material,
    }
}

/// `fill_density` tolerates a trailing `%`
fn extract_infill_percentage(config: &HashMap<String, String>) -> u32 {
    let Some(raw) = config.get("fill_density") else {
        return DEFAULT_INFILL;
    };
    let trimmed = raw.replace('%', "");
    match trimmed.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(value = %raw, "invalid fill_density value, using default");
            DEFAULT_INFILL
        }
    }
}

fn extract_infill_pattern(config: &HashMap<String, String>) -> InfillPattern {
    let Some(raw) = config.get("fill_pattern") else {
        return DEFAULT_INFILL_PATTERN;
    };
    match InfillPattern::from_value(raw) {
        Some(pattern) => pattern,
        None => {
            warn!(value = %raw, "unknown infill pattern, using default");
            DEFAULT_INFILL_PATTERN
        }
    }
}

fn extract_brim_style(config: &HashMap<String, String>) -> BrimStyle {
    let Some(raw) = config.get("brim_type") else {
        return DEFAULT_BRIM_STYLE;
    };
    match BrimStyle::from_value(raw) {
        Some(style) => style,
        None => {
            warn!(value = %raw, "unknown brim type, using default");
            DEFAULT_BRIM_STYLE
        }
    }
}

fn coerce_f64(config: &HashMap<String, String>, key: &str, default: f64) -> f64 {
    config
        .get(key)
        .and_then(|v| coerce_value::<f64>(key, v))
        .unwrap_or(default)
}

fn coerce_u32(config: &HashMap<String, String>, key: &str, default: u32) -> u32 {
    config
        .get(key)
        .and_then(|v| coerce_value::<u32>(key, v))
        .unwrap_or(default)
}

/// Slicer profiles use `1`/`0` for booleans; `true` is accepted as well
fn coerce_bool(config: &HashMap<String, String>, key: &str, default: bool) -> bool {
    match config.get(key) {
        Some(value) => value == "1" || value.eq_ignore_ascii_case("true"),
        None => default,
    }
}

fn coerce_value<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!(key, value, "invalid value, falling back to default");
            None
        }
    }
}
