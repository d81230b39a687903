//! Base profile resolution
//!
//! Candidate names follow `{technology}_{material}_{layer}_{supports}.ini`,
//! all lowercase, with the layer height rendered as `%.2f` minus the dot
//! (0.2 becomes "020"). Existence is probed in a descending-specificity
//! chain; the first existing file wins and the ultimate default is returned
//! unconditionally when nothing matches, so resolution never fails.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Ultimate default profile, used when no convention-named file exists
pub const DEFAULT_PROFILE: &str = "bambu_a1.ini";

/// Resolves base profile files from a profile directory
#[derive(Debug, Clone)]
pub struct ProfileResolver {
    dir: PathBuf,
}

impl ProfileResolver {
    /// Create a resolver over a profile directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the profile filename for a parameter combination
    ///
    /// Probe chain: exact match, then without the supports qualifier, then
    /// without the layer-height qualifier, then technology only, then
    /// [`DEFAULT_PROFILE`].
    pub fn resolve(
        &self,
        technology: &str,
        material: &str,
        layer_height: f64,
        supports: bool,
    ) -> String {
        let technology = technology.to_lowercase();
        let material = material.to_lowercase();
        let layer = layer_token(layer_height);
        let supports = if supports { "supports" } else { "nosupports" };

        let candidates = [
            format!("{technology}_{material}_{layer}_{supports}.ini"),
            format!("{technology}_{material}_{layer}.ini"),
            format!("{technology}_{material}.ini"),
            format!("{technology}.ini"),
        ];

        for candidate in candidates {
            if self.dir.join(&candidate).exists() {
                debug!(profile = %candidate, "resolved base profile");
                return candidate;
            }
        }

        warn!(profile = DEFAULT_PROFILE, "no specific profile found, using default");
        DEFAULT_PROFILE.to_string()
    }

    /// Full path of a profile filename inside the profile directory
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Resolve directly to a full path
    pub fn resolve_path(
        &self,
        technology: &str,
        material: &str,
        layer_height: f64,
        supports: bool,
    ) -> PathBuf {
        self.path_of(&self.resolve(technology, material, layer_height, supports))
    }

    /// The directory this resolver probes
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Layer height rendered for filenames: `%.2f` with the dot removed
fn layer_token(layer_height: f64) -> String {
    format!("{layer_height:.2}").replace('.', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), "layer_height = 0.2\n").unwrap();
    }

    #[test]
    fn test_layer_token_formatting() {
        assert_eq!(layer_token(0.2), "020");
        assert_eq!(layer_token(0.15), "015");
        assert_eq!(layer_token(0.1), "010");
    }

    #[test]
    fn test_exact_match_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fdm_pla_020_supports.ini");
        touch(dir.path(), "fdm_pla_020.ini");
        let resolver = ProfileResolver::new(dir.path());
        assert_eq!(
            resolver.resolve("FDM", "PLA", 0.2, true),
            "fdm_pla_020_supports.ini"
        );
    }

    #[test]
    fn test_chain_drops_qualifiers_in_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fdm_pla.ini");
        touch(dir.path(), "fdm.ini");
        let resolver = ProfileResolver::new(dir.path());
        assert_eq!(resolver.resolve("FDM", "PLA", 0.2, false), "fdm_pla.ini");
    }

    #[test]
    fn test_technology_only_fallback() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "sla.ini");
        let resolver = ProfileResolver::new(dir.path());
        assert_eq!(resolver.resolve("SLA", "ABS", 0.05, false), "sla.ini");
    }

    #[test]
    fn test_ultimate_default_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ProfileResolver::new(dir.path());
        assert_eq!(resolver.resolve("FDM", "TPU", 0.3, true), DEFAULT_PROFILE);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fdm_petg_015.ini");
        let resolver = ProfileResolver::new(dir.path());
        let first = resolver.resolve("FDM", "PETG", 0.15, true);
        let second = resolver.resolve("FDM", "PETG", 0.15, true);
        assert_eq!(first, second);
    }
}
