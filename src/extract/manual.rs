//! Manual parameter source for mesh formats
//!
//! STL and OBJ files contain only geometry, so the full parameter set must
//! arrive with the request. No file inspection happens here.

use crate::error::{Error, Result};
use crate::model::PrintParameters;
use std::path::Path;

pub(super) fn derive(
    model_path: &Path,
    supplied: Option<&PrintParameters>,
) -> Result<PrintParameters> {
    let Some(params) = supplied else {
        let kind = model_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "mesh".to_string());
        return Err(Error::MissingParameters(format!(
            "Print parameters are required for {kind} files. \
             Required fields: technology, material, layerHeight, shells, infill, supports. \
             Only 3MF packages support automatic parameter extraction."
        )));
    };
    Ok(params.clone())
}
