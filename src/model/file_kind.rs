//! Model-file kind classification
//!
//! A file's kind is resolved once per request from the filename suffix,
//! case-insensitively. An unknown suffix is a classification failure, not a
//! default.

use crate::error::{Error, Result};

/// Supported model-file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFileKind {
    /// Stereolithography mesh (`.stl`), geometry only
    Stl,
    /// Wavefront mesh (`.obj`), geometry only
    Obj,
    /// 3MF package (`.3mf`), a ZIP container that can embed print settings
    ThreeMf,
}

impl ModelFileKind {
    /// All supported kinds, in suffix-probe order
    pub const ALL: [ModelFileKind; 3] = [
        ModelFileKind::Stl,
        ModelFileKind::Obj,
        ModelFileKind::ThreeMf,
    ];

    /// The filename suffix bound to this kind, including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            ModelFileKind::Stl => ".stl",
            ModelFileKind::Obj => ".obj",
            ModelFileKind::ThreeMf => ".3mf",
        }
    }

    /// Short display name used in messages
    pub fn name(&self) -> &'static str {
        match self {
            ModelFileKind::Stl => "STL",
            ModelFileKind::Obj => "OBJ",
            ModelFileKind::ThreeMf => "3MF",
        }
    }

    /// Classify a filename by its suffix
    ///
    /// The filename is lowercased and known suffixes are probed in a fixed
    /// order; the first match wins.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFileType`] for a blank filename or an
    /// unrecognized suffix. The message names the supported formats.
    pub fn from_filename(filename: &str) -> Result<Self> {
        if filename.trim().is_empty() {
            return Err(Error::InvalidFileType(
                "Filename cannot be empty".to_string(),
            ));
        }

        let lower = filename.to_lowercase();
        for kind in Self::ALL {
            if lower.ends_with(kind.extension()) {
                return Ok(kind);
            }
        }

        Err(Error::InvalidFileType(
            "Unsupported file type. Supported formats: STL, OBJ, 3MF".to_string(),
        ))
    }
}

impl std::fmt::Display for ModelFileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
