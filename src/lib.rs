//! # printquote
//!
//! Material cost and print time quotation for 3D-printable files.
//!
//! The crate takes an uploaded model file (an STL or OBJ mesh, or a 3MF
//! package), delegates the heavy lifting to an external slicing engine
//! (PrusaSlicer or BambuStudio), and converts the engine's output into a
//! priced quotation. It owns everything around the engine: file-kind
//! classification, per-format parameter derivation, profile resolution and
//! generation, bounded process execution, resilient output parsing across
//! historical dialects, and deterministic pricing. Temporary artifacts are
//! removed on every path, success or failure.
//!
//! ## Example
//!
//! ```no_run
//! use printquote::{PrintParameters, QuotationService, QuoteConfig, UploadedFile};
//!
//! # fn main() -> printquote::Result<()> {
//! let service = QuotationService::new(
//!     QuoteConfig::new()
//!         .with_slicer_path("/usr/bin/prusa-slicer")
//!         .with_profile_dir("/etc/printquote/profiles"),
//! );
//!
//! let upload = UploadedFile::new("benchy.stl", std::fs::read("benchy.stl")?);
//! let params = PrintParameters::new("FDM", "PLA", 0.2, 2, 15, false);
//!
//! let quotation = service.quote(&upload, Some(&params))?;
//! println!(
//!     "{}g, {}min -> {} {}",
//!     quotation.filament_grams,
//!     quotation.print_minutes,
//!     quotation.total_cost,
//!     quotation.currency
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod compat;
pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod orient;
pub mod output;
pub mod pricing;
pub mod profile;
pub mod service;
pub mod slicer;

pub use config::QuoteConfig;
pub use error::{Error, Result};
pub use model::{
    BrimStyle, InfillPattern, ModelFileKind, PrintParameters, SeamPosition, UploadedFile,
};
pub use output::SlicingOutcome;
pub use pricing::{MaterialRates, Money, PricingTable, Quotation};
pub use service::QuotationService;
pub use slicer::SlicerVendor;
