//! PrusaSlicer command construction

use super::{absolute_arg, layer_height_arg, support_args};
use crate::error::Result;
use crate::model::{BrimStyle, PrintParameters};
use std::path::Path;
use tracing::debug;

/// Brim width applied when a brim is wanted but no width was given
const DEFAULT_BRIM_WIDTH: u32 = 5;

pub(super) fn command_line(
    slicer_path: &Path,
    model_path: &Path,
    profile_path: &Path,
    output_path: &Path,
    params: &PrintParameters,
) -> Result<Vec<String>> {
    let profile = absolute_arg(profile_path)?;
    let output = absolute_arg(output_path)?;
    let model = absolute_arg(model_path)?;

    let mut command = vec![
        slicer_path.to_string_lossy().into_owned(),
        "--load".to_string(),
        profile,
        "--layer-height".to_string(),
        layer_height_arg(params.layer_height),
        "--perimeters".to_string(),
        params.shells.to_string(),
        "--fill-density".to_string(),
        format!("{}%", params.infill),
    ];

    if let Some(pattern) = params.infill_pattern {
        command.push("--fill-pattern".to_string());
        command.push(pattern.as_str().to_string());
    }
    if let Some(top) = params.top_shell_layers {
        command.push("--top-solid-layers".to_string());
        command.push(top.to_string());
    }
    if let Some(bottom) = params.bottom_shell_layers {
        command.push("--bottom-solid-layers".to_string());
        command.push(bottom.to_string());
    }

    command.push("--brim-width".to_string());
    match params.brim_style {
        Some(style) if style != BrimStyle::None => {
            command.push(params.brim_width.unwrap_or(DEFAULT_BRIM_WIDTH).to_string());
        }
        _ => command.push("0".to_string()),
    }

    command.extend(support_args(params.supports));
    if params.supports {
        // Organic (tree) supports throughout
        command.push("--support-material-style".to_string());
        command.push("organic".to_string());
    }

    if let Some(seam) = params.seam {
        command.push("--seam-position".to_string());
        command.push(seam.as_str().to_string());
    }

    command.push("--output".to_string());
    command.push(output);
    command.push("--export-gcode".to_string());
    // Center the model on a 220x220mm bed; holds for both meshes and packages
    command.push("--center".to_string());
    command.push("110,110".to_string());
    command.push(model);

    debug!(
        layer_height = params.layer_height,
        shells = params.shells,
        infill = params.infill,
        supports = params.supports,
        "built PrusaSlicer command"
    );

    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InfillPattern, SeamPosition};

    fn build(params: &PrintParameters) -> Vec<String> {
        command_line(
            Path::new("/usr/bin/prusa-slicer"),
            Path::new("/tmp/model.stl"),
            Path::new("/tmp/profile.ini"),
            Path::new("/tmp/model_output.gcode"),
            params,
        )
        .unwrap()
    }

    #[test]
    fn test_mandatory_arguments_present_in_order() {
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        let command = build(&params);
        assert_eq!(command[0], "/usr/bin/prusa-slicer");
        assert_eq!(command[1], "--load");
        assert_eq!(command[2], "/tmp/profile.ini");
        assert!(command.contains(&"--layer-height".to_string()));
        assert!(command.contains(&"0.20".to_string()));
        assert!(command.contains(&"15%".to_string()));
        assert_eq!(command.last().unwrap(), "/tmp/model.stl");
    }

    #[test]
    fn test_supports_enable_the_full_triplet() {
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, true);
        let command = build(&params);
        assert!(command.contains(&"--support-material=1".to_string()));
        assert!(command.contains(&"--support-material-auto=1".to_string()));
        let style = command
            .iter()
            .position(|a| a == "--support-material-style")
            .unwrap();
        assert_eq!(command[style + 1], "organic");
    }

    #[test]
    fn test_supports_disabled_pair_is_consistent() {
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        let command = build(&params);
        assert!(command.contains(&"--support-material=0".to_string()));
        assert!(command.contains(&"--support-material-auto=0".to_string()));
        assert!(!command.contains(&"--support-material-style".to_string()));
    }

    #[test]
    fn test_brim_defaults_to_zero_without_style() {
        let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        let command = build(&params);
        let brim = command.iter().position(|a| a == "--brim-width").unwrap();
        assert_eq!(command[brim + 1], "0");
    }

    #[test]
    fn test_brim_width_defaulted_when_style_set() {
        let mut params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
        params.brim_style = Some(BrimStyle::Auto);
        let command = build(&params);
        let brim = command.iter().position(|a| a == "--brim-width").unwrap();
        assert_eq!(command[brim + 1], DEFAULT_BRIM_WIDTH.to_string());
    }

    #[test]
    fn test_optional_settings_emitted_when_present() {
        let mut params = PrintParameters::new("FDM", "PETG", 0.15, 3, 20, false);
        params.infill_pattern = Some(InfillPattern::Gyroid);
        params.top_shell_layers = Some(6);
        params.bottom_shell_layers = Some(4);
        params.seam = Some(SeamPosition::Rear);
        let command = build(&params);
        assert!(command.contains(&"gyroid".to_string()));
        assert!(command.contains(&"--top-solid-layers".to_string()));
        assert!(command.contains(&"--bottom-solid-layers".to_string()));
        assert!(command.contains(&"--seam-position".to_string()));
        assert!(command.contains(&"rear".to_string()));
    }
}
