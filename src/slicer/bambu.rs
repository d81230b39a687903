//! BambuStudio command construction
//!
//! BambuStudio accepts the same CLI vocabulary as PrusaSlicer for the subset
//! of options used here, so this builder emits the reduced flag set.

use super::{absolute_arg, layer_height_arg, support_args};
use crate::error::Result;
use crate::model::PrintParameters;
use std::path::Path;
use tracing::debug;

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

    debug!(
        layer_height = params.layer_height,
        shells = params.shells,
        infill = params.infill,
        supports = params.supports,
        "built BambuStudio command"
    );

    let [support, support_auto] = support_args(params.supports);
    Ok(vec![
        slicer_path.to_string_lossy().into_owned(),
        "--load".to_string(),
        profile,
        "--layer-height".to_string(),
        layer_height_arg(params.layer_height),
        "--perimeters".to_string(),
        params.shells.to_string(),
        "--fill-density".to_string(),
        format!("{}%", params.infill),
        support,
        support_auto,
        "--output".to_string(),
        output,
        "--export-gcode".to_string(),
        "--center".to_string(),
        "110,110".to_string(),
        model,
    ])
}
