//! The quotation pipeline
//!
//! One request flows strictly sequentially: upload validation, file-kind
//! classification, temporary save, parameter derivation, compatibility
//! check, profile resolution and generation, optional reorientation,
//! slicing, output parsing, pricing. Requests share no mutable state;
//! collision avoidance in the temp directory comes from unique artifact
//! names, not locking.
//!
//! Every stage that creates a filesystem artifact registers a drop guard so
//! an early return mid-pipeline still removes everything allocated so far.
//! Each stage's cleanup only deletes names matching its own convention.

use crate::compat;
use crate::config::QuoteConfig;
use crate::error::Result;
use crate::extract::ParameterSource;
use crate::model::{ModelFileKind, UploadedFile};
use crate::orient::OrientationAdjuster;
use crate::pricing::{Quotation, price_quotation};
use crate::profile::{DynamicProfileGenerator, ProfileResolver};
use crate::slicer::{SlicerVendor, slice_model};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Produces priced quotations for uploaded model files
#[derive(Debug, Clone)]
pub struct QuotationService {
    config: QuoteConfig,
}

impl QuotationService {
    /// Create a service over a configuration
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    /// The service configuration
    pub fn config(&self) -> &QuoteConfig {
        &self.config
    }

    /// Produce a quotation for an uploaded model
    ///
    /// `supplied` carries the caller's print parameters; mesh formats
    /// require them, the package format ignores them in favor of its
    /// embedded metadata.
    ///
    /// # Errors
    ///
    /// Client-input failures ([`crate::Error::InvalidFileType`],
    /// [`crate::Error::InvalidCombination`],
    /// [`crate::Error::MissingParameters`]) surface exactly as raised by
    /// their stage; slicing and parse failures surface as the
    /// engine-carrying [`crate::Error::Slicing`] family. Temp artifacts are
    /// removed on every path.
    pub fn quote(
        &self,
        upload: &UploadedFile,
        supplied: Option<&crate::model::PrintParameters>,
    ) -> Result<Quotation> {
        info!(file = %upload.file_name, "starting quotation");

        let kind = upload.validate()?;
        let vendor = SlicerVendor::from_name(&self.config.slicer_vendor)?;

        let saved = self.save_upload(upload)?;
        let _saved_guard = defer({
            let path = saved.clone();
            move || cleanup_saved_upload(&path)
        });

        let params = ParameterSource::for_kind(kind).derive(&saved, supplied)?;
        compat::ensure_compatible(&params.technology, &params.material)?;

        let resolver = ProfileResolver::new(&self.config.profile_dir);
        let base = resolver.resolve_path(
            &params.technology,
            &params.material,
            params.layer_height,
            params.supports,
        );
        debug!(profile = %base.display(), "using base profile");

        let generator = DynamicProfileGenerator::new(&self.config.temp_dir);
        let profile = generator.generate(&base, &params)?;
        let _profile_guard = defer({
            let generator = generator.clone();
            let path = profile.clone();
            move || generator.cleanup(&path)
        });

        let orienter = OrientationAdjuster::new(
            self.config.orientation_enabled,
            &self.config.orientation_tool,
            self.config.orientation_timeout,
        );
        let (model_path, adjusted) = orienter.orient_if_requested(&saved, params.auto_orient);
        let _oriented_guard = defer({
            let orienter = orienter.clone();
            let path = model_path.clone();
            move || {
                if adjusted {
                    orienter.cleanup(&path);
                }
            }
        });

        let output_path = output_path_for(&model_path, kind);
        let outcome = slice_model(
            vendor,
            &self.config.slicer_path,
            &model_path,
            &profile,
            &output_path,
            &params,
            self.config.slicing_timeout,
        )?;

        price_quotation(&outcome, &upload.file_name, params, &self.config.pricing)
    }

    /// Save the upload under a timestamp-prefixed unique name
    fn save_upload(&self, upload: &UploadedFile) -> Result<PathBuf> {
        fs::create_dir_all(&self.config.temp_dir)?;

        // Only the final component of the supplied name is kept; anything
        // resembling a path must not steer the write location.
        let original = Path::new(&upload.file_name)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("model");
        let path = self
            .config
            .temp_dir
            .join(format!("{}_{original}", epoch_millis()));

        fs::write(&path, &upload.bytes)?;
        debug!(path = %path.display(), "saved uploaded file");
        Ok(path)
    }
}

/// Derive the engine output path next to the model file
fn output_path_for(model_path: &Path, kind: ModelFileKind) -> PathBuf {
    let name = model_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("model");
    let stem = if name.to_lowercase().ends_with(kind.extension()) {
        &name[..name.len() - kind.extension().len()]
    } else {
        name
    };
    model_path.with_file_name(format!("{stem}_output.gcode"))
}

/// Delete a saved upload, refusing names outside this stage's convention
fn cleanup_saved_upload(path: &Path) {
    let owned = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| match n.split_once('_') {
            Some((stamp, _)) => !stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()),
            None => false,
        });
    if !owned {
        return;
    }
    if let Err(err) = fs::remove_file(path) {
        if path.exists() {
            warn!(path = %path.display(), %err, "could not delete saved upload");
        }
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

/// Run a closure when the guard drops, on success and failure paths alike
struct Deferred<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> Drop for Deferred<F> {
    fn drop(&mut self) {
        if let Some(cleanup) = self.0.take() {
            cleanup();
        }
    }
}

fn defer<F: FnOnce()>(cleanup: F) -> Deferred<F> {
    Deferred(Some(cleanup))
}
