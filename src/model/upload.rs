//! Upload boundary
//!
//! The HTTP layer is out of scope; an upload arrives here as a filename plus
//! the raw bytes. Empty files and blank filenames are rejected before any
//! other processing.

use crate::error::{Error, Result};
use crate::model::ModelFileKind;

/// An uploaded model file: original filename plus contents
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// The filename as supplied by the caller
    pub file_name: String,
    /// The raw file contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Wrap a filename and contents
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Whether the upload carries no data
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Validate the upload and classify its file kind
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFileType`] for an empty file, a blank
    /// filename, or an unrecognized suffix.
    pub fn validate(&self) -> Result<ModelFileKind> {
        if self.is_empty() {
            return Err(Error::InvalidFileType("File is empty".to_string()));
        }
        ModelFileKind::from_filename(&self.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_rejected_before_classification() {
        let upload = UploadedFile::new("part.stl", Vec::new());
        let err = upload.validate().unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_blank_filename_rejected() {
        let upload = UploadedFile::new("", b"solid part".to_vec());
        assert!(matches!(
            upload.validate(),
            Err(Error::InvalidFileType(_))
        ));
    }

    #[test]
    fn test_valid_upload_classifies() {
        let upload = UploadedFile::new("part.stl", b"solid part".to_vec());
        assert_eq!(upload.validate().unwrap(), ModelFileKind::Stl);
    }
}
