//! Parameter derivation per model-file kind
//!
//! Mesh formats carry only geometry, so their print parameters must be
//! supplied by the caller. The package format embeds slicer settings and is
//! extracted from the file itself, ignoring any supplied values. Which
//! strategy applies is a pure function of the file kind.

mod manual;
mod package;

pub use package::{MAX_ARCHIVE_ENTRIES, MAX_ENTRY_SIZE};

use crate::error::Result;
use crate::model::{ModelFileKind, PrintParameters};
use std::path::Path;

/// Where a request's effective print parameters come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterSource {
    /// Parameters must be supplied by the caller (mesh formats)
    Manual,
    /// Parameters are extracted from package metadata, overriding any
    /// supplied values field-by-field
    Package,
}

impl ParameterSource {
    /// Select the source strategy for a file kind
    pub fn for_kind(kind: ModelFileKind) -> Self {
        match kind {
            ModelFileKind::Stl | ModelFileKind::Obj => ParameterSource::Manual,
            ModelFileKind::ThreeMf => ParameterSource::Package,
        }
    }

    /// Whether this source requires caller-supplied parameters
    pub fn requires_manual_parameters(&self) -> bool {
        matches!(self, ParameterSource::Manual)
    }

    /// Derive the effective parameters for a saved model file
    ///
    /// # Errors
    ///
    /// The manual variant fails with [`crate::Error::MissingParameters`]
    /// when nothing was supplied; the package variant fails with
    /// [`crate::Error::Archive`] for a corrupt archive and
    /// [`crate::Error::FileParse`] when a defensive cap is exceeded.
    pub fn derive(
        &self,
        model_path: &Path,
        supplied: Option<&PrintParameters>,
    ) -> Result<PrintParameters> {
        match self {
            ParameterSource::Manual => manual::derive(model_path, supplied),
            ParameterSource::Package => package::extract(model_path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_selection_is_a_pure_lookup() {
        assert_eq!(
            ParameterSource::for_kind(ModelFileKind::Stl),
            ParameterSource::Manual
        );
        assert_eq!(
            ParameterSource::for_kind(ModelFileKind::Obj),
            ParameterSource::Manual
        );
        assert_eq!(
            ParameterSource::for_kind(ModelFileKind::ThreeMf),
            ParameterSource::Package
        );
    }

    #[test]
    fn test_capability_flags() {
        assert!(ParameterSource::Manual.requires_manual_parameters());
        assert!(!ParameterSource::Package.requires_manual_parameters());
    }
}
