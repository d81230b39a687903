//! Error types for quotation processing
//!
//! This module provides error handling for the whole quotation pipeline.
//! All errors include error codes for categorization.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O and archive errors
//! - **E2xxx**: Client-input errors (file type, parameters, combinations)
//! - **E3xxx**: File-parse errors (archive or profile corruption)
//! - **E4xxx**: Slicing-engine errors
//! - **E5xxx**: Security violations
//! - **E6xxx**: Generic processing errors

use std::io;
use thiserror::Error;

/// Result type for quotation operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a quotation
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error while reading a package-format model
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted archive
    /// - Unsupported compression method
    /// - Truncated file
    #[error("[E1002] Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// The uploaded file is not a supported model format
    ///
    /// **Error Code**: E2001
    ///
    /// Raised for an empty upload, a blank filename, or an unrecognized
    /// filename suffix.
    #[error("[E2001] Invalid file type: {0}")]
    InvalidFileType(String),

    /// The requested technology/material pair is not printable
    ///
    /// **Error Code**: E2002
    #[error("[E2002] Invalid combination: {0}")]
    InvalidCombination(String),

    /// Required print parameters were not supplied
    ///
    /// **Error Code**: E2003
    ///
    /// Mesh formats carry no embedded settings, so the caller must provide
    /// the full parameter set for them.
    #[error("[E2003] Missing parameters: {0}")]
    MissingParameters(String),

    /// No slicing engine matches the configured vendor name
    ///
    /// **Error Code**: E2004
    #[error("[E2004] Unknown slicer vendor: {0}")]
    UnknownVendor(String),

    /// A parameter value is outside its accepted range or unknown
    ///
    /// **Error Code**: E2005
    #[error("[E2005] Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A model package or profile file could not be parsed
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - Archive entry count or entry size over the configured caps
    /// - Corrupted metadata entries
    #[error("[E3001] File parse error: {0}")]
    FileParse(String),

    /// The slicing engine failed
    ///
    /// **Error Code**: E4001
    ///
    /// Carries the engine's captured stderr (or launch diagnostics) so the
    /// caller can surface "could not produce a quotation" with detail.
    #[error("[E4001] Slicing failed: {0}")]
    Slicing(String),

    /// The slicing engine exceeded its wall-clock bound and was terminated
    ///
    /// **Error Code**: E4002
    #[error("[E4002] Slicing timed out after {0} seconds")]
    SlicingTimeout(u64),

    /// A path argument contained traversal sequences or shell metacharacters
    ///
    /// **Error Code**: E5001
    ///
    /// Always fatal to the request; never downgraded to an ordinary
    /// validation failure.
    #[error("[E5001] Security violation: {0}")]
    SecurityViolation(String),

    /// Generic processing failure
    ///
    /// **Error Code**: E6001
    #[error("[E6001] Processing error: {0}")]
    Processing(String),
}

impl Error {
    /// Create an InvalidParameter error for a value outside its bounds
    ///
    /// # Arguments
    /// * `name` - The parameter name (e.g., "layer height")
    /// * `min` / `max` - The accepted range
    /// * `got` - The offending value
    pub fn parameter_out_of_range(name: &str, min: f64, max: f64, got: f64) -> Self {
        Error::InvalidParameter(format!(
            "{name} must be between {min:.2} and {max:.2}, got: {got:.2}"
        ))
    }

    /// Create an InvalidCombination error naming both halves of the pair
    pub fn incompatible(technology: &str, material: &str) -> Self {
        Error::InvalidCombination(format!(
            "Material {material} is not compatible with technology {technology}"
        ))
    }

    /// Create a FileParse error with context about which file was being read
    pub fn file_parse_context(context: &str, message: &str) -> Self {
        Error::FileParse(format!("{context}: {message}"))
    }
}
