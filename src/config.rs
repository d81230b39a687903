//! Service configuration
//!
//! `QuoteConfig` collects everything the pipeline needs to know about its
//! environment: directories, the slicing engine, timeouts, the orientation
//! tool, and the pricing tables. Built with chained `with_*` calls.

use crate::pricing::PricingTable;
use std::path::PathBuf;
use std::time::Duration;

/// Default wall-clock bound on one slicing run
pub const DEFAULT_SLICING_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default wall-clock bound on one orientation run
pub const DEFAULT_ORIENTATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Configuration for a [`crate::QuotationService`]
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    pub(crate) temp_dir: PathBuf,
    pub(crate) profile_dir: PathBuf,
    pub(crate) slicer_vendor: String,
    pub(crate) slicer_path: PathBuf,
    pub(crate) slicing_timeout: Duration,
    pub(crate) orientation_enabled: bool,
    pub(crate) orientation_tool: PathBuf,
    pub(crate) orientation_timeout: Duration,
    pub(crate) pricing: PricingTable,
}

impl QuoteConfig {
    /// Create a configuration with defaults
    ///
    /// Defaults: PrusaSlicer resolved from `PATH`, profiles under
    /// `slicer-configs`, temp files under the system temp directory, stock
    /// pricing rates, orientation disabled.
    pub fn new() -> Self {
        Self {
            temp_dir: std::env::temp_dir().join("printquote"),
            profile_dir: PathBuf::from("slicer-configs"),
            slicer_vendor: "prusa".to_string(),
            slicer_path: PathBuf::from("prusa-slicer"),
            slicing_timeout: DEFAULT_SLICING_TIMEOUT,
            orientation_enabled: false,
            orientation_tool: PathBuf::from("auto-orient"),
            orientation_timeout: DEFAULT_ORIENTATION_TIMEOUT,
            pricing: PricingTable::default(),
        }
    }

    /// Set the directory for transient request artifacts
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    /// Set the directory probed for base slicer profiles
    pub fn with_profile_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.profile_dir = dir.into();
        self
    }

    /// Select the slicing engine by vendor identifier (e.g. "prusa")
    pub fn with_slicer_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.slicer_vendor = vendor.into();
        self
    }

    /// Set the slicing engine executable
    pub fn with_slicer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.slicer_path = path.into();
        self
    }

    /// Bound one slicing run's wall-clock time
    pub fn with_slicing_timeout(mut self, timeout: Duration) -> Self {
        self.slicing_timeout = timeout;
        self
    }

    /// Enable orientation pre-processing with the given tool
    pub fn with_orientation_tool(mut self, tool: impl Into<PathBuf>) -> Self {
        self.orientation_enabled = true;
        self.orientation_tool = tool.into();
        self
    }

    /// Bound one orientation run's wall-clock time
    pub fn with_orientation_timeout(mut self, timeout: Duration) -> Self {
        self.orientation_timeout = timeout;
        self
    }

    /// Replace the pricing tables
    pub fn with_pricing(mut self, pricing: PricingTable) -> Self {
        self.pricing = pricing;
        self
    }

    /// The configured pricing tables
    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self::new()
    }
}
